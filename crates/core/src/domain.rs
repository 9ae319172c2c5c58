use serde::Serialize;

/// Every panel the dashboard can show, in tab-bar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TabId {
    Demand,
    ThreePl,
    Ride,
    Incentives,
    Payouts,
    Hotspots,
    Credit,
    Mg,
    Energy,
    Maintenance,
    Underwriting,
    Cashflow,
    Expansion,
    Retention,
    Beckn,
    Launch,
    Jobs,
}

impl TabId {
    pub const COUNT: usize = 17;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Demand,
        Self::ThreePl,
        Self::Ride,
        Self::Incentives,
        Self::Payouts,
        Self::Hotspots,
        Self::Credit,
        Self::Mg,
        Self::Energy,
        Self::Maintenance,
        Self::Underwriting,
        Self::Cashflow,
        Self::Expansion,
        Self::Retention,
        Self::Beckn,
        Self::Launch,
        Self::Jobs,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Demand => "demand",
            Self::ThreePl => "threepl",
            Self::Ride => "ride",
            Self::Incentives => "incentives",
            Self::Payouts => "payouts",
            Self::Hotspots => "hotspots",
            Self::Credit => "credit",
            Self::Mg => "mg",
            Self::Energy => "energy",
            Self::Maintenance => "maint",
            Self::Underwriting => "uw",
            Self::Cashflow => "cf",
            Self::Expansion => "exp",
            Self::Retention => "ret",
            Self::Beckn => "beckn",
            Self::Launch => "launch",
            Self::Jobs => "jobs",
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim().to_lowercase();
        Self::ALL.into_iter().find(|tab| {
            tab.as_str() == value || tab.label().to_lowercase() == value
        })
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Demand => "Demand",
            Self::ThreePl => "3PL",
            Self::Ride => "Ride",
            Self::Incentives => "Incentives",
            Self::Payouts => "Payouts",
            Self::Hotspots => "Hotspots",
            Self::Credit => "Credit",
            Self::Mg => "MG",
            Self::Energy => "Energy",
            Self::Maintenance => "Maintenance",
            Self::Underwriting => "Underwriting",
            Self::Cashflow => "Cashflow",
            Self::Expansion => "Expansion",
            Self::Retention => "Retention",
            Self::Beckn => "Beckn",
            Self::Launch => "Launch",
            Self::Jobs => "Jobs",
        }
    }
}

/// Traffic-light signal attached to scores and chips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Green,
    Yellow,
    Red,
}

impl Signal {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "green" => Some(Self::Green),
            "yellow" | "amber" => Some(Self::Yellow),
            "red" => Some(Self::Red),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}
