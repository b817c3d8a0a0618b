//! User-facing text: column display names, status messages and chart titles.

use crate::error::{ReportError, Result};
use crate::record::Column;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "web", derive(clap::ValueEnum))]
pub enum Locale {
    Pt,
    En,
}

impl Locale {
    /// Language code for the HTML `lang` attribute
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Pt => "pt",
            Locale::En => "en",
        }
    }
}

/// Localisation table for everything the dashboard shows to the user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Labels {
    /// Display name per internal column name
    pub columns: BTreeMap<String, String>,
    pub page_title: String,
    pub intro: String,
    pub upload_prompt: String,
    pub process_button: String,
    pub export_csv_button: String,
    pub export_xlsx_button: String,
    pub waiting: String,
    /// `{files}` is replaced by the number of uploaded files
    pub processed: String,
    pub failed: String,
    pub no_summary: String,
    pub summary_header: String,
    pub charts_header: String,
    pub show_all: String,
    pub all_data_header: String,
    pub chart_avg_delay: String,
    pub chart_stop_count: String,
    pub chart_total_delay: String,
    pub chart_stop_time: String,
}

fn column_table(names: [&str; 10]) -> BTreeMap<String, String> {
    Column::ALL
        .iter()
        .zip(names)
        .map(|(column, name)| (column.key().to_string(), name.to_string()))
        .collect()
}

impl Labels {
    pub fn portuguese() -> Self {
        Self {
            columns: column_table([
                "Seção",
                "Direção",
                "Intervalo",
                "Atraso Total (min)",
                "Atraso Médio (s/veic)",
                "Tempo de Parada (min)",
                "Tempo de Parada Médio (s/veic)",
                "Nº de Paradas",
                "Média de Paradas/veic",
                "Arquivo",
            ]),
            page_title: "Dashboard de Análise de Simulação de Tráfego".to_string(),
            intro: "Faça o upload de um ou mais arquivos de relatório (.xls) para visualizar os resultados consolidados.".to_string(),
            upload_prompt: "Escolha os arquivos .xls".to_string(),
            process_button: "Processar".to_string(),
            export_csv_button: "Exportar CSV".to_string(),
            export_xlsx_button: "Exportar XLSX".to_string(),
            waiting: "Aguardando o upload dos arquivos...".to_string(),
            processed: "{files} arquivo(s) processado(s) com sucesso!".to_string(),
            failed: "Não foi possível processar os arquivos. Verifique o formato e o conteúdo.".to_string(),
            no_summary: "Nenhuma linha de 'Summary' foi encontrada nos arquivos processados.".to_string(),
            summary_header: "Resultados do Sumário".to_string(),
            charts_header: "Visualização Gráfica do Sumário".to_string(),
            show_all: "Mostrar todos os dados (incluindo intervalos)".to_string(),
            all_data_header: "Dados Completos".to_string(),
            chart_avg_delay: "Atraso Médio por Direção".to_string(),
            chart_stop_count: "Número de Paradas por Direção".to_string(),
            chart_total_delay: "Atraso Total (min) por Direção".to_string(),
            chart_stop_time: "Tempo de Parada Total (min) por Direção".to_string(),
        }
    }

    pub fn english() -> Self {
        Self {
            columns: column_table([
                "Section",
                "Direction",
                "Interval",
                "Total Delay (min)",
                "Avg Delay (s/veh)",
                "Stop Time (min)",
                "Avg Stop Time (s/veh)",
                "Stops",
                "Avg Stops/veh",
                "File",
            ]),
            page_title: "Traffic Simulation Analysis Dashboard".to_string(),
            intro: "Upload one or more report files (.xls) to see the consolidated results.".to_string(),
            upload_prompt: "Choose the .xls files".to_string(),
            process_button: "Process".to_string(),
            export_csv_button: "Export CSV".to_string(),
            export_xlsx_button: "Export XLSX".to_string(),
            waiting: "Waiting for file upload...".to_string(),
            processed: "{files} file(s) processed successfully!".to_string(),
            failed: "The files could not be processed. Check their format and content.".to_string(),
            no_summary: "No 'Summary' row was found in the processed files.".to_string(),
            summary_header: "Summary Results".to_string(),
            charts_header: "Summary Charts".to_string(),
            show_all: "Show all data (including intervals)".to_string(),
            all_data_header: "Full Data".to_string(),
            chart_avg_delay: "Average Delay by Direction".to_string(),
            chart_stop_count: "Number of Stops by Direction".to_string(),
            chart_total_delay: "Total Delay (min) by Direction".to_string(),
            chart_stop_time: "Total Stop Time (min) by Direction".to_string(),
        }
    }

    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::Pt => Self::portuguese(),
            Locale::En => Self::english(),
        }
    }

    /// Display name of a column, falling back to its internal name
    pub fn column(&self, column: Column) -> &str {
        self.columns
            .get(column.key())
            .map(String::as_str)
            .unwrap_or(column.key())
    }

    pub fn headers(&self) -> Vec<String> {
        Column::ALL
            .iter()
            .map(|column| self.column(*column).to_string())
            .collect()
    }

    pub fn processed_message(&self, files: usize) -> String {
        self.processed.replace("{files}", &files.to_string())
    }

    /// Overlay a partial JSON table on top of `base`.
    ///
    /// Keys absent from `json` keep the value from `base`, including
    /// individual column names.
    pub fn from_json_str(json: &str, base: &Labels) -> serde_json::Result<Self> {
        let overlay: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(base)?;
        merge(&mut merged, overlay);
        serde_json::from_value(merged)
    }

    pub fn from_json_file(path: impl AsRef<Path>, base: &Labels) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content, base).map_err(|source| ReportError::Labels {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::portuguese()
    }
}

fn merge(base: &mut Value, overlay: Value) {
    match overlay {
        Value::Object(overlay_map) if base.is_object() => {
            if let Some(base_map) = base.as_object_mut() {
                for (key, value) in overlay_map {
                    merge(base_map.entry(key).or_insert(Value::Null), value);
                }
            }
        }
        value => *base = value,
    }
}
