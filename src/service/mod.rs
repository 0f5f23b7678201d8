pub mod export;
pub mod grouper;
pub mod merger;
pub mod price_calculator;
pub mod renderer;
pub mod service_aggregator;
pub mod tooth_range;

pub use export::lines_to_csv;
pub use grouper::group_by_type;
pub use merger::ProductMerger;
pub use price_calculator::PriceCalculator;
pub use renderer::InvoiceRenderer;
pub use service_aggregator::ServiceAggregator;
pub use tooth_range::format_range;
