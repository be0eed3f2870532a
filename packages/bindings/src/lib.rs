use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Bean pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn price_beans(input_json: String) -> NapiResult<String> {
    let input: roast_pricing_core::pricing::BeanBatchInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = roast_pricing_core::pricing::price_beans(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn simulate_discount(input_json: String) -> NapiResult<String> {
    let input: roast_pricing_core::discount::DiscountInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        roast_pricing_core::discount::simulate_discount(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn price_blend(input_json: String) -> NapiResult<String> {
    let input: roast_pricing_core::blend::BlendInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = roast_pricing_core::blend::price_blend(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Channels and market
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_fees(input_json: String) -> NapiResult<String> {
    let input: roast_pricing_core::fees::FeeComparisonInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = roast_pricing_core::fees::compare_fees(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn market_reference(input_json: String) -> NapiResult<String> {
    let input: roast_pricing_core::market::MarketReferenceInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        roast_pricing_core::market::market_reference(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
