use serde::{Serialize, Serializer};
use std::fmt;

/// Literal first-cell text of an aggregate row
pub const SUMMARY_LABEL: &str = "Summary";

/// Roadway segment codes that open a section of a report
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Section {
    #[serde(rename = "NWB")]
    Nwb,
    #[serde(rename = "SEB")]
    Seb,
    #[serde(rename = "EB")]
    Eb,
    #[serde(rename = "WB")]
    Wb,
}

impl Section {
    pub const ALL: [Section; 4] = [Section::Nwb, Section::Seb, Section::Eb, Section::Wb];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Nwb => "NWB",
            Section::Seb => "SEB",
            Section::Eb => "EB",
            Section::Wb => "WB",
        }
    }

    /// Exact match against the section codes. `"NWB-extra"` is not a section.
    pub fn from_label(label: &str) -> Option<Self> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == label)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interval column of a record: a raw time token or the summary marker
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Interval {
    Summary,
    Time(String),
}

impl Interval {
    pub fn as_str(&self) -> &str {
        match self {
            Interval::Summary => SUMMARY_LABEL,
            Interval::Time(token) => token,
        }
    }

    pub fn is_summary(&self) -> bool {
        matches!(self, Interval::Summary)
    }
}

impl Serialize for Interval {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The six measurements of a report row, in column order 1..=6
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    TotalDelayMin,
    AvgDelaySecVeh,
    StopTimeMin,
    AvgStopTimeSecVeh,
    StopCount,
    AvgStopsPerVeh,
}

impl Metric {
    pub const ALL: [Metric; 6] = [
        Metric::TotalDelayMin,
        Metric::AvgDelaySecVeh,
        Metric::StopTimeMin,
        Metric::AvgStopTimeSecVeh,
        Metric::StopCount,
        Metric::AvgStopsPerVeh,
    ];

    /// Zero-based spreadsheet column holding this measurement
    pub fn position(&self) -> usize {
        match self {
            Metric::TotalDelayMin => 1,
            Metric::AvgDelaySecVeh => 2,
            Metric::StopTimeMin => 3,
            Metric::AvgStopTimeSecVeh => 4,
            Metric::StopCount => 5,
            Metric::AvgStopsPerVeh => 6,
        }
    }

    pub fn column(&self) -> Column {
        match self {
            Metric::TotalDelayMin => Column::TotalDelayMin,
            Metric::AvgDelaySecVeh => Column::AvgDelaySecVeh,
            Metric::StopTimeMin => Column::StopTimeMin,
            Metric::AvgStopTimeSecVeh => Column::AvgStopTimeSecVeh,
            Metric::StopCount => Column::StopCount,
            Metric::AvgStopsPerVeh => Column::AvgStopsPerVeh,
        }
    }
}

/// Columns of the combined result table, in display order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Section,
    Direction,
    Interval,
    TotalDelayMin,
    AvgDelaySecVeh,
    StopTimeMin,
    AvgStopTimeSecVeh,
    StopCount,
    AvgStopsPerVeh,
    SourceFile,
}

impl Column {
    pub const ALL: [Column; 10] = [
        Column::Section,
        Column::Direction,
        Column::Interval,
        Column::TotalDelayMin,
        Column::AvgDelaySecVeh,
        Column::StopTimeMin,
        Column::AvgStopTimeSecVeh,
        Column::StopCount,
        Column::AvgStopsPerVeh,
        Column::SourceFile,
    ];

    /// Internal column name, used as the serialized key
    pub fn key(&self) -> &'static str {
        match self {
            Column::Section => "Section",
            Column::Direction => "Direction",
            Column::Interval => "Interval",
            Column::TotalDelayMin => "Total_Delay_min",
            Column::AvgDelaySecVeh => "Avg_Delay_sec_veh",
            Column::StopTimeMin => "Stop_Time_min",
            Column::AvgStopTimeSecVeh => "Avg_Stop_Time_sec_veh",
            Column::StopCount => "Stop_Count",
            Column::AvgStopsPerVeh => "Avg_Stops_per_veh",
            Column::SourceFile => "Source_File",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Measurements {
    #[serde(rename = "Total_Delay_min")]
    pub total_delay_min: Option<f64>,
    #[serde(rename = "Avg_Delay_sec_veh")]
    pub avg_delay_sec_veh: Option<f64>,
    #[serde(rename = "Stop_Time_min")]
    pub stop_time_min: Option<f64>,
    #[serde(rename = "Avg_Stop_Time_sec_veh")]
    pub avg_stop_time_sec_veh: Option<f64>,
    #[serde(rename = "Stop_Count")]
    pub stop_count: Option<f64>,
    #[serde(rename = "Avg_Stops_per_veh")]
    pub avg_stops_per_veh: Option<f64>,
}

impl Measurements {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::TotalDelayMin => self.total_delay_min,
            Metric::AvgDelaySecVeh => self.avg_delay_sec_veh,
            Metric::StopTimeMin => self.stop_time_min,
            Metric::AvgStopTimeSecVeh => self.avg_stop_time_sec_veh,
            Metric::StopCount => self.stop_count,
            Metric::AvgStopsPerVeh => self.avg_stops_per_veh,
        }
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        let slot = match metric {
            Metric::TotalDelayMin => &mut self.total_delay_min,
            Metric::AvgDelaySecVeh => &mut self.avg_delay_sec_veh,
            Metric::StopTimeMin => &mut self.stop_time_min,
            Metric::AvgStopTimeSecVeh => &mut self.avg_stop_time_sec_veh,
            Metric::StopCount => &mut self.stop_count,
            Metric::AvgStopsPerVeh => &mut self.avg_stops_per_veh,
        };
        *slot = value;
    }
}

/// One interval or summary row extracted from a report
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "Section")]
    pub section: Option<Section>,
    #[serde(rename = "Direction")]
    pub direction: Option<String>,
    #[serde(rename = "Interval")]
    pub interval: Interval,
    #[serde(flatten)]
    pub measurements: Measurements,
}

/// A record tagged with the name of the file it came from
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SourcedRecord {
    #[serde(flatten)]
    pub record: Record,
    #[serde(rename = "Source_File")]
    pub source_file: String,
}

/// A single table cell of a sourced record
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Field<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

impl Field<'_> {
    /// Display text; missing values render as the empty string
    pub fn display(&self) -> String {
        match self {
            Field::Text(text) => text.to_string(),
            Field::Number(number) => number.to_string(),
            Field::Missing => String::new(),
        }
    }
}

impl SourcedRecord {
    pub fn field(&self, column: Column) -> Field<'_> {
        let number = |metric: Metric| match self.record.measurements.get(metric) {
            Some(value) => Field::Number(value),
            None => Field::Missing,
        };

        match column {
            Column::Section => match self.record.section {
                Some(section) => Field::Text(section.as_str()),
                None => Field::Missing,
            },
            Column::Direction => match &self.record.direction {
                Some(direction) => Field::Text(direction),
                None => Field::Missing,
            },
            Column::Interval => Field::Text(self.record.interval.as_str()),
            Column::TotalDelayMin => number(Metric::TotalDelayMin),
            Column::AvgDelaySecVeh => number(Metric::AvgDelaySecVeh),
            Column::StopTimeMin => number(Metric::StopTimeMin),
            Column::AvgStopTimeSecVeh => number(Metric::AvgStopTimeSecVeh),
            Column::StopCount => number(Metric::StopCount),
            Column::AvgStopsPerVeh => number(Metric::AvgStopsPerVeh),
            Column::SourceFile => Field::Text(&self.source_file),
        }
    }
}
