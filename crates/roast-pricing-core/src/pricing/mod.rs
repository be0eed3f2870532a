pub mod batch;
pub mod bean;
pub mod report;
pub mod settings;

pub use batch::{
    price_beans, BatchPricingOutput, BeanBatchInput, ExcludedBean, PricedBean, MAX_BEANS,
};
pub use bean::{price_bean, BeanInput, BeanPricing, BREAKEVEN_UNREACHABLE};
pub use report::{BeanRow, Totals};
pub use settings::PricingSettings;
