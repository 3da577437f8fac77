//! Dashboard statistics
//!
//! Each role has its own board-stats endpoint; counters the server omits
//! read as zero.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which dashboard to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardKind {
    Broker,
    Carrier,
    Customer,
}

impl DashboardKind {
    /// Endpoint path below the API base
    pub fn path(&self) -> &'static str {
        match self {
            Self::Broker => "dashboard/broker-dashboard-board-stats",
            Self::Carrier => "dashboard/carrier-dashboard-board-stats",
            Self::Customer => "dashboard/customer-dashboard-board-stats",
        }
    }
}

impl fmt::Display for DashboardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Broker => "broker",
            Self::Carrier => "carrier",
            Self::Customer => "customer",
        })
    }
}

impl FromStr for DashboardKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "broker" => Ok(Self::Broker),
            "carrier" => Ok(Self::Carrier),
            "customer" => Ok(Self::Customer),
            other => Err(format!("unknown dashboard: {other}")),
        }
    }
}

/// Load counters shared by every board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoadCounts {
    pub total_loads: u64,
    pub pending_loads: u64,
    pub posted_loads: u64,
    pub in_transit_loads: u64,
    pub delivered_loads: u64,
    pub cancelled_loads: u64,
}

/// Broker board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrokerDashboardStats {
    #[serde(flatten)]
    pub loads: LoadCounts,
    pub total_carriers: u64,
    pub total_customers: u64,
    pub pending_quotes: u64,
    pub total_revenue: f64,
}

/// Carrier board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarrierDashboardStats {
    #[serde(flatten)]
    pub loads: LoadCounts,
    pub requested_loads: u64,
    pub assigned_loads: u64,
    pub total_earnings: f64,
}

/// Customer board
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerDashboardStats {
    #[serde(flatten)]
    pub loads: LoadCounts,
    pub open_quotes: u64,
    pub total_spend: f64,
}

/// Stats for whichever board was requested
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DashboardStats {
    Broker(BrokerDashboardStats),
    Carrier(CarrierDashboardStats),
    Customer(CustomerDashboardStats),
}

impl DashboardStats {
    pub fn kind(&self) -> DashboardKind {
        match self {
            Self::Broker(_) => DashboardKind::Broker,
            Self::Carrier(_) => DashboardKind::Carrier,
            Self::Customer(_) => DashboardKind::Customer,
        }
    }

    pub fn loads(&self) -> &LoadCounts {
        match self {
            Self::Broker(s) => &s.loads,
            Self::Carrier(s) => &s.loads,
            Self::Customer(s) => &s.loads,
        }
    }

    /// Decode a board body; the kind picks the shape since the JSON is untagged
    pub fn from_value(kind: DashboardKind, value: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match kind {
            DashboardKind::Broker => Self::Broker(serde_json::from_value(value)?),
            DashboardKind::Carrier => Self::Carrier(serde_json::from_value(value)?),
            DashboardKind::Customer => Self::Customer(serde_json::from_value(value)?),
        })
    }
}
