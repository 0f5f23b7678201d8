pub mod money;
pub mod product;
pub mod result;
pub mod service;
pub mod shade;
pub mod snapshot;
pub mod totals;

pub use product::{
    DiscountedPrice, MergeKey, MergedProduct, ProductType, ToothAssignment, ToothNumber, ToothSet,
};
pub use result::{RenderedInvoice, TypeGroup};
pub use service::{CommonService, CommonServiceRef, ServiceCatalog, ServiceDef, ServiceId};
pub use shade::{ShadeSlot, ShadeValue, Shades};
pub use snapshot::{CaseProduct, CaseSnapshot, RawDiscountedPrice, RenderRequest, TeethProduct};
pub use totals::{
    DiscountKind, InvoiceDiscount, InvoiceLine, InvoiceTotals, TaxRates, TaxSource,
};
