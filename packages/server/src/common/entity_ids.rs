//! Typed ID definitions for domain entities.

pub use super::id::Id;

/// Marker type for vendor (and super-admin) accounts.
pub struct Vendor;

/// Marker type for catalog products referenced by a vendor account.
pub struct Product;

/// Typed ID for vendor accounts.
pub type VendorId = Id<Vendor>;

/// Typed ID for products. The catalog itself lives outside this service.
pub type ProductId = Id<Product>;
