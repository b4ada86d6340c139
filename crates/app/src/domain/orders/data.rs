//! Order Data

/// Checkout input: destination and the courier the buyer picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewOrder {
    pub shipping_address: Option<String>,
    pub destination_area_id: Option<String>,
    pub destination_postal_code: Option<String>,
    pub destination_contact_name: Option<String>,
    pub destination_contact_phone: Option<String>,
    pub courier_company: Option<String>,
    pub courier_type: Option<String>,
    pub courier_service_name: Option<String>,

    /// Client-side shipping estimate, used when no authoritative quote exists.
    pub shipping_cost: u64,
    pub shipping_etd: Option<String>,
}
