//! Order Records

use std::{fmt, str::FromStr};

use jiff::Timestamp;

use crate::{
    domain::{accounts::records::AccountUuid, products::records::ProductUuid},
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Line UUID
pub type OrderLineUuid = TypedUuid<OrderLineRecord>;

/// Order lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Pending,
    Paid,
    Processing,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether a shipment may be booked for an order in this state.
    #[must_use]
    pub const fn is_shippable(self) -> bool {
        matches!(self, Self::Paid | Self::Processing)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOrderStatus(pub String);

impl fmt::Display for UnknownOrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown order status '{}'", self.0)
    }
}

impl std::error::Error for UnknownOrderStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(UnknownOrderStatus(other.to_string())),
        }
    }
}

/// Order Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    pub account_uuid: AccountUuid,
    pub subtotal: u64,
    pub shipping_cost: u64,
    pub total: u64,
    pub status: OrderStatus,
    pub shipping_address: Option<String>,
    pub destination_area_id: Option<String>,
    pub destination_postal_code: Option<String>,
    pub destination_contact_name: Option<String>,
    pub destination_contact_phone: Option<String>,
    pub courier_company: Option<String>,
    pub courier_type: Option<String>,
    pub courier_service_name: Option<String>,
    pub shipping_etd: Option<String>,
    pub gateway_order_id: Option<String>,
    pub payment_token: Option<String>,
    pub payment_transaction_id: Option<String>,
    pub shipment_id: Option<String>,
    pub waybill_id: Option<String>,
    pub tracking_status: Option<String>,
    pub tracking_url: Option<String>,
    pub lines: Vec<OrderLineRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderRecord {
    /// Sum of frozen line price × quantity.
    #[must_use]
    pub fn lines_total(&self) -> u64 {
        self.lines
            .iter()
            .map(OrderLineRecord::line_total)
            .fold(0, u64::saturating_add)
    }
}

/// Order Line Record, frozen at order creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLineRecord {
    pub uuid: OrderLineUuid,
    pub order_uuid: OrderUuid,
    pub product_uuid: Option<ProductUuid>,
    pub product_name: String,
    pub variant_name: Option<String>,
    pub quantity: i32,
    pub price: u64,
    pub weight: i32,
}

impl OrderLineRecord {
    #[must_use]
    pub fn line_total(&self) -> u64 {
        let quantity = u64::try_from(self.quantity).unwrap_or_default();

        self.price.saturating_mul(quantity)
    }
}
