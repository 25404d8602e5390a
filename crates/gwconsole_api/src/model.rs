use std::fmt;

use gwconsole_table::{CellValue, SelectOption, TableRow};
use serde::{Deserialize, Deserializer, Serialize};

/// Gateway service kind, encoded as an integer on the wire
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum LoadType {
    #[default]
    Http,
    Tcp,
    Grpc,
}

impl LoadType {
    pub const ALL: [Self; 3] = [Self::Http, Self::Tcp, Self::Grpc];

    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Http => 0,
            Self::Tcp => 1,
            Self::Grpc => 2,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Http => "HTTP",
            Self::Tcp => "TCP",
            Self::Grpc => "GRPC",
        }
    }

    /// Options for a select filter keyed by the wire code
    #[must_use]
    pub fn select_options() -> Vec<SelectOption> {
        Self::ALL
            .iter()
            .map(|load_type| {
                SelectOption::new(load_type.label(), load_type.code().to_string())
            })
            .collect()
    }
}

impl TryFrom<u8> for LoadType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Http),
            1 => Ok(Self::Tcp),
            2 => Ok(Self::Grpc),
            other => Err(format!("unknown load type {other}")),
        }
    }
}

impl From<LoadType> for u8 {
    fn from(value: LoadType) -> Self {
        value.code()
    }
}

impl fmt::Display for LoadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the services list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub service_name: String,
    #[serde(default)]
    pub service_desc: String,
    pub load_type: LoadType,
    #[serde(default)]
    pub service_addr: String,
    #[serde(default)]
    pub qps: i64,
    #[serde(default)]
    pub qpd: i64,
    #[serde(default)]
    pub total_node: i64,
}

impl TableRow for ServiceRecord {
    fn cell(&self, column_id: &str) -> CellValue {
        match column_id {
            "id" => CellValue::text(&self.id),
            "serviceName" => dash_if_empty(&self.service_name),
            "serviceDesc" => dash_if_empty(&self.service_desc),
            "loadType" => CellValue::text(self.load_type.label()),
            "serviceAddr" => dash_if_empty(&self.service_addr),
            "qps" => self.qps.into(),
            "qpd" => self.qpd.into(),
            "totalNode" => self.total_node.into(),
            _ => CellValue::Empty,
        }
    }
}

fn dash_if_empty(value: &str) -> CellValue {
    if value.is_empty() {
        CellValue::text("-")
    } else {
        CellValue::text(value)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}

/// Gateway-wide traffic figures shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePanel {
    #[serde(default)]
    pub service_num: u64,
    #[serde(default)]
    pub today_request_num: u64,
    #[serde(default)]
    pub yesterday_request_num: u64,
    #[serde(default, rename = "currentQPS")]
    pub current_qps: u64,
}

const SECONDS_PER_DAY: f64 = 86_400.0;

#[allow(clippy::cast_precision_loss)]
impl ServicePanel {
    /// Today's requests relative to yesterday, in percent.
    ///
    /// `None` when there is no traffic from yesterday to compare against.
    #[must_use]
    pub fn day_over_day(&self) -> Option<f64> {
        if self.yesterday_request_num == 0 {
            return None;
        }
        let today = self.today_request_num as f64;
        let yesterday = self.yesterday_request_num as f64;
        Some((today - yesterday) / yesterday * 100.0)
    }

    #[must_use]
    pub fn yesterday_average_qps(&self) -> f64 {
        self.yesterday_request_num as f64 / SECONDS_PER_DAY
    }
}

/// Number of services per [`LoadType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadTypeCounts {
    pub http: usize,
    pub tcp: usize,
    pub grpc: usize,
}

impl LoadTypeCounts {
    #[must_use]
    pub const fn get(&self, load_type: LoadType) -> usize {
        match load_type {
            LoadType::Http => self.http,
            LoadType::Tcp => self.tcp,
            LoadType::Grpc => self.grpc,
        }
    }

    pub fn set(&mut self, load_type: LoadType, count: usize) {
        match load_type {
            LoadType::Http => self.http = count,
            LoadType::Tcp => self.tcp = count,
            LoadType::Grpc => self.grpc = count,
        }
    }
}
