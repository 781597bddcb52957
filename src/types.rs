use crate::table::TableRow;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// One parsed CSV row keyed by canonical header.
pub type RawRow = HashMap<String, String>;

/// Vehicle type label counted as a battery electric vehicle in the overview.
pub const BEV_TYPE: &str = "Battery Electric Vehicle (BEV)";

/// One registered electric vehicle. Values are copied verbatim from the CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    pub make: String,
    pub model: String,
    pub model_year: String,
    pub vehicle_type: String,
    pub city: String,
    pub county: String,
    pub state: String,
    pub postal_code: String,
    pub vin: String,
    pub electric_range: String,
    pub electric_utility: String,
    pub legislative_district: String,
    pub census_tract: String,
    #[serde(rename = "baseMSRP")]
    pub base_msrp: String,
    pub cafv_eligibility: String,
    pub dol_vehicle_id: String,
    pub location: String,
}

impl VehicleRecord {
    /// Build a record from a normalized row. Missing fields become empty.
    pub fn from_row(row: &RawRow) -> Self {
        let mut record = VehicleRecord::default();
        for field in VehicleField::ALL {
            if let Some(value) = row.get(field.canonical()) {
                *record.field_mut(field) = value.clone();
            }
        }
        record
    }

    pub fn field(&self, field: VehicleField) -> &str {
        match field {
            VehicleField::Make => &self.make,
            VehicleField::Model => &self.model,
            VehicleField::ModelYear => &self.model_year,
            VehicleField::VehicleType => &self.vehicle_type,
            VehicleField::City => &self.city,
            VehicleField::County => &self.county,
            VehicleField::State => &self.state,
            VehicleField::PostalCode => &self.postal_code,
            VehicleField::Vin => &self.vin,
            VehicleField::ElectricRange => &self.electric_range,
            VehicleField::ElectricUtility => &self.electric_utility,
            VehicleField::LegislativeDistrict => &self.legislative_district,
            VehicleField::CensusTract => &self.census_tract,
            VehicleField::BaseMsrp => &self.base_msrp,
            VehicleField::CafvEligibility => &self.cafv_eligibility,
            VehicleField::DolVehicleId => &self.dol_vehicle_id,
            VehicleField::Location => &self.location,
        }
    }

    fn field_mut(&mut self, field: VehicleField) -> &mut String {
        match field {
            VehicleField::Make => &mut self.make,
            VehicleField::Model => &mut self.model,
            VehicleField::ModelYear => &mut self.model_year,
            VehicleField::VehicleType => &mut self.vehicle_type,
            VehicleField::City => &mut self.city,
            VehicleField::County => &mut self.county,
            VehicleField::State => &mut self.state,
            VehicleField::PostalCode => &mut self.postal_code,
            VehicleField::Vin => &mut self.vin,
            VehicleField::ElectricRange => &mut self.electric_range,
            VehicleField::ElectricUtility => &mut self.electric_utility,
            VehicleField::LegislativeDistrict => &mut self.legislative_district,
            VehicleField::CensusTract => &mut self.census_tract,
            VehicleField::BaseMsrp => &mut self.base_msrp,
            VehicleField::CafvEligibility => &mut self.cafv_eligibility,
            VehicleField::DolVehicleId => &mut self.dol_vehicle_id,
            VehicleField::Location => &mut self.location,
        }
    }
}

impl TableRow for VehicleRecord {
    type Key = VehicleField;

    fn cell(&self, key: VehicleField) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.field(key)))
    }

    fn cells(&self) -> Vec<Cow<'_, str>> {
        VehicleField::ALL
            .iter()
            .map(|f| Cow::Borrowed(self.field(*f)))
            .collect()
    }
}

/// Canonical vehicle fields, in record order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleField {
    Make,
    Model,
    ModelYear,
    VehicleType,
    City,
    County,
    State,
    PostalCode,
    Vin,
    ElectricRange,
    ElectricUtility,
    LegislativeDistrict,
    CensusTract,
    BaseMsrp,
    CafvEligibility,
    DolVehicleId,
    Location,
}

impl VehicleField {
    pub const ALL: [VehicleField; 17] = [
        VehicleField::Make,
        VehicleField::Model,
        VehicleField::ModelYear,
        VehicleField::VehicleType,
        VehicleField::City,
        VehicleField::County,
        VehicleField::State,
        VehicleField::PostalCode,
        VehicleField::Vin,
        VehicleField::ElectricRange,
        VehicleField::ElectricUtility,
        VehicleField::LegislativeDistrict,
        VehicleField::CensusTract,
        VehicleField::BaseMsrp,
        VehicleField::CafvEligibility,
        VehicleField::DolVehicleId,
        VehicleField::Location,
    ];

    /// Canonical name produced by header normalization.
    pub fn canonical(self) -> &'static str {
        match self {
            VehicleField::Make => "make",
            VehicleField::Model => "model",
            VehicleField::ModelYear => "modelYear",
            VehicleField::VehicleType => "vehicleType",
            VehicleField::City => "city",
            VehicleField::County => "county",
            VehicleField::State => "state",
            VehicleField::PostalCode => "postalCode",
            VehicleField::Vin => "vin",
            VehicleField::ElectricRange => "electricRange",
            VehicleField::ElectricUtility => "electricUtility",
            VehicleField::LegislativeDistrict => "legislativeDistrict",
            VehicleField::CensusTract => "censusTract",
            VehicleField::BaseMsrp => "baseMSRP",
            VehicleField::CafvEligibility => "cafvEligibility",
            VehicleField::DolVehicleId => "dolVehicleId",
            VehicleField::Location => "location",
        }
    }
}

impl fmt::Display for VehicleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical())
    }
}

impl FromStr for VehicleField {
    type Err = String;

    /// Accepts the canonical name in any case, plus the short table labels
    /// (`year`, `type`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        match wanted.as_str() {
            "year" => return Ok(VehicleField::ModelYear),
            "type" => return Ok(VehicleField::VehicleType),
            _ => {}
        }
        VehicleField::ALL
            .into_iter()
            .find(|f| f.canonical().to_lowercase() == wanted)
            .ok_or_else(|| format!("unknown column '{}'", s.trim()))
    }
}

/// Icon reference attached to an overview card. Rendering is up to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Icon {
    Car,
    Battery,
    Bolt,
    Industry,
}

/// Display-ready overview card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewMetric {
    pub title: &'static str,
    pub value: String,
    pub icon: Icon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    GrowthByYear,
    BevVsPhev,
    TopMakers,
    TopCities,
}

impl ChartKind {
    pub fn title(self) -> &'static str {
        match self {
            ChartKind::GrowthByYear => "EV Growth by Year",
            ChartKind::BevVsPhev => "BEV vs PHEV",
            ChartKind::TopMakers => "Top 5 Manufacturers",
            ChartKind::TopCities => "Top 5 Cities",
        }
    }

    /// Base name of the exported CSV file.
    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::GrowthByYear => "chart_growth_by_year",
            ChartKind::BevVsPhev => "chart_bev_vs_phev",
            ChartKind::TopMakers => "chart_top_makers",
            ChartKind::TopCities => "chart_top_cities",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub category: String,
    pub count: usize,
}

impl SeriesPoint {
    pub fn new(category: impl Into<String>, count: usize) -> Self {
        Self {
            category: category.into(),
            count,
        }
    }
}

/// Ordered (category, count) pairs for one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub points: Vec<SeriesPoint>,
}

impl ChartSeries {
    pub fn total(&self) -> usize {
        self.points.iter().map(|p| p.count).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub by_year: ChartSeries,
    pub bev_vs_phev: ChartSeries,
    pub top_makers: ChartSeries,
    pub top_cities: ChartSeries,
}

impl ChartData {
    pub fn series(&self) -> [&ChartSeries; 4] {
        [
            &self.by_year,
            &self.bev_vs_phev,
            &self.top_makers,
            &self.top_cities,
        ]
    }
}

#[derive(Debug, Tabled, Clone)]
pub struct MetricRow {
    #[tabled(rename = "")]
    pub icon: String,
    #[tabled(rename = "Metric")]
    pub title: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Tabled, Clone)]
pub struct SeriesRow {
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Count")]
    pub count: String,
    #[tabled(rename = "Share")]
    pub share: String,
    #[tabled(rename = "")]
    pub bar: String,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub generated_at: DateTime<Utc>,
    pub overview: Vec<OverviewMetric>,
    pub charts: ChartData,
}
