use napi::bindgen_prelude::Buffer;
use napi::Result as NapiResult;
use napi_derive::napi;

use carbon_loan_core::carbon::emissions::{
    self, FinancingImpactInput, PenaltyRiskInput, SavingsInput, TripInput,
};
use carbon_loan_core::carbon::profile::ProfileCatalog;
use carbon_loan_core::carbon::rate_model::{self, RateAdjustmentInput};
use carbon_loan_core::loan::amortization::{self, AmortizationInput};
use carbon_loan_core::loan::pricing::{self, PricingInput};
use carbon_loan_core::session::activity_log::{ActivityLog, LogKind, LogStatus};
use carbon_loan_core::session::file_registry::{format_size, FileRegistry};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Rate model
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_rate_adjustment(input_json: String) -> NapiResult<String> {
    let input: RateAdjustmentInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rate_model::compute_rate_adjustment(&input.profile, input.actual_emissions)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// The built-in emission-profile catalog.
#[napi]
pub fn emission_profiles() -> NapiResult<String> {
    let catalog = ProfileCatalog::default();
    serde_json::to_string(catalog.profiles()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Emissions
// ---------------------------------------------------------------------------

/// Trip emissions in kg CO2e, as a decimal string.
#[napi]
pub fn calculate_emissions(input_json: String) -> NapiResult<String> {
    let input: TripInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let kg = emissions::calculate_emissions(input.vehicle_type, input.distance_km, input.weight_tonnes)
        .map_err(to_napi_error)?;
    Ok(kg.to_string())
}

#[napi]
pub fn calculate_emissions_savings(input_json: String) -> NapiResult<String> {
    let input: SavingsInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = emissions::calculate_emissions_savings(input.current_emissions, input.baseline_emissions)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_penalty_risk(input_json: String) -> NapiResult<String> {
    let input: PenaltyRiskInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = emissions::calculate_penalty_risk(
        input.total_emissions_kg,
        input.threshold_kg,
        input.turnover,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn calculate_financing_impact(input_json: String) -> NapiResult<String> {
    let input: FinancingImpactInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = emissions::calculate_financing_impact(input.esg_score, input.turnover)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loan
// ---------------------------------------------------------------------------

#[napi]
pub fn amortize(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::build_amortization_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn price_carbon_linked_loan(input_json: String) -> NapiResult<String> {
    let input: PricingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = pricing::price_carbon_linked_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Activity log and uploaded files for one dashboard session. Each JS
/// instance owns its own state.
#[napi]
pub struct DashboardSession {
    log: ActivityLog,
    files: FileRegistry,
}

impl Default for DashboardSession {
    fn default() -> Self {
        Self::new()
    }
}

#[napi]
impl DashboardSession {
    #[napi(constructor)]
    pub fn new() -> Self {
        DashboardSession {
            log: ActivityLog::new(),
            files: FileRegistry::new(),
        }
    }

    /// Record an activity. `kind` and `status` use the log's lowercase names;
    /// status defaults to `success`. Returns the stored entry as JSON.
    #[napi]
    pub fn record_activity(
        &mut self,
        action: String,
        description: String,
        kind: String,
        status: Option<String>,
        details_json: Option<String>,
    ) -> NapiResult<String> {
        let kind: LogKind =
            serde_json::from_value(serde_json::Value::String(kind)).map_err(to_napi_error)?;
        let status: LogStatus = match status {
            Some(s) => serde_json::from_value(serde_json::Value::String(s)).map_err(to_napi_error)?,
            None => LogStatus::default(),
        };
        let details = details_json
            .map(|d| serde_json::from_str(&d))
            .transpose()
            .map_err(to_napi_error)?;
        let entry = self.log.record(&action, &description, kind, status, details);
        serde_json::to_string(entry).map_err(to_napi_error)
    }

    /// All entries, newest first, as a JSON array.
    #[napi]
    pub fn export_activity(&self) -> NapiResult<String> {
        self.log.export_json().map_err(to_napi_error)
    }

    #[napi]
    pub fn clear_activity(&mut self) {
        self.log.clear();
    }

    /// Store an uploaded file and return its metadata as JSON.
    #[napi]
    pub fn add_file(&mut self, name: String, content_type: String, data: Buffer) -> NapiResult<String> {
        let file = self.files.add(&name, &content_type, data.to_vec());
        serde_json::to_string(file).map_err(to_napi_error)
    }

    /// Metadata of every stored file as a JSON array.
    #[napi]
    pub fn list_files(&self) -> NapiResult<String> {
        serde_json::to_string(self.files.list()).map_err(to_napi_error)
    }

    /// File contents, or `null` for an unknown id.
    #[napi]
    pub fn file_data(&self, id: String) -> Option<Buffer> {
        self.files.get(&id).map(|f| Buffer::from(f.data.clone()))
    }

    #[napi]
    pub fn remove_file(&mut self, id: String) -> bool {
        self.files.remove(&id).is_some()
    }

    #[napi]
    pub fn clear_files(&mut self) {
        self.files.clear();
    }

    /// Total stored size, human readable (e.g. "2 KB").
    #[napi]
    pub fn storage_used(&self) -> String {
        format_size(self.files.total_bytes())
    }
}
