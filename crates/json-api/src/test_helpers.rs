//! Test helpers.

use std::{path::PathBuf, sync::Arc};

use jiff::Timestamp;
use salvo::{affix_state::inject, http::header::SET_COOKIE, prelude::*};

use bazaar_app::{
    auth::{SESSION_COOKIE, SessionKeys},
    context::AppContext,
    domain::{
        accounts::{
            MockAccountsService,
            records::{AccountRecord, AccountUuid, Role},
        },
        carts::MockCartsService,
        orders::{
            MockOrdersService,
            records::{OrderLineRecord, OrderLineUuid, OrderRecord, OrderStatus, OrderUuid},
        },
        payments::MockPaymentsService,
        products::{
            MockProductsService,
            records::{ProductRecord, ProductUuid},
        },
        settings::MockSettingsService,
        shipping::MockShippingService,
    },
};

use crate::{extensions::*, state::State};

pub(crate) const TEST_SESSION_SECRET: &str = "test-session-secret";

/// One mock per service; tests set expectations on the ones they exercise.
#[derive(Default)]
pub(crate) struct Mocks {
    pub(crate) accounts: MockAccountsService,
    pub(crate) products: MockProductsService,
    pub(crate) carts: MockCartsService,
    pub(crate) orders: MockOrdersService,
    pub(crate) payments: MockPaymentsService,
    pub(crate) shipping: MockShippingService,
    pub(crate) settings: MockSettingsService,
}

impl Mocks {
    pub(crate) fn into_state(self) -> Arc<State> {
        self.into_state_at(std::env::temp_dir())
    }

    pub(crate) fn into_state_at(self, upload_dir: PathBuf) -> Arc<State> {
        State::shared(
            AppContext {
                accounts: Arc::new(self.accounts),
                products: Arc::new(self.products),
                carts: Arc::new(self.carts),
                orders: Arc::new(self.orders),
                payments: Arc::new(self.payments),
                shipping: Arc::new(self.shipping),
                settings: Arc::new(self.settings),
                sessions: session_keys(),
            },
            upload_dir,
        )
    }
}

pub(crate) fn session_keys() -> SessionKeys {
    SessionKeys::new(TEST_SESSION_SECRET)
}

/// Puts a signed-in account into the depot, standing in for the session
/// middleware.
struct InjectAccount(Option<AccountRecord>);

#[handler]
impl InjectAccount {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        if let Some(account) = self.0.clone() {
            depot.insert_account(account);
        }

        ctrl.call_next(req, depot, res).await;
    }
}

pub(crate) fn service_as(mocks: Mocks, account: Option<AccountRecord>, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state()))
            .hoop(InjectAccount(account))
            .push(route),
    )
}

pub(crate) fn upload_service(mocks: Mocks, upload_dir: PathBuf, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(mocks.into_state_at(upload_dir)))
            .hoop(InjectAccount(Some(seller())))
            .push(route),
    )
}

fn account(email: &str, role: Role) -> AccountRecord {
    AccountRecord {
        uuid: AccountUuid::new(),
        email: email.to_string(),
        name: "Ana Lestari".to_string(),
        phone: Some("08123456789".to_string()),
        address: Some("Jl. Merdeka 1".to_string()),
        city: Some("Bandung".to_string()),
        province: Some("Jawa Barat".to_string()),
        postal_code: Some("40115".to_string()),
        area_id: None,
        role,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn buyer() -> AccountRecord {
    account("ana@example.com", Role::Buyer)
}

pub(crate) fn seller() -> AccountRecord {
    account("toko@example.com", Role::Seller)
}

pub(crate) fn make_product(slug: &str, price: u64) -> ProductRecord {
    ProductRecord {
        uuid: ProductUuid::new(),
        name: "Kaos Polos".to_string(),
        slug: slug.to_string(),
        price,
        original_price: None,
        category: Some("Fashion".to_string()),
        description: None,
        sold_count: 0,
        stock: 10,
        rating: 0.0,
        weight: 500,
        length: 10,
        width: 10,
        height: 10,
        primary_image: None,
        video_url: None,
        images: vec![],
        variants: vec![],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_order(account: AccountUuid, status: OrderStatus) -> OrderRecord {
    let uuid = OrderUuid::new();

    OrderRecord {
        uuid,
        account_uuid: account,
        subtotal: 50_000,
        shipping_cost: 15_000,
        total: 65_000,
        status,
        shipping_address: Some("Jl. Merdeka 1".to_string()),
        destination_area_id: Some("IDNP9IDNC74IDND846IDZ40115".to_string()),
        destination_postal_code: Some("40115".to_string()),
        destination_contact_name: Some("Ana Lestari".to_string()),
        destination_contact_phone: Some("08123456789".to_string()),
        courier_company: Some("jne".to_string()),
        courier_type: Some("reg".to_string()),
        courier_service_name: Some("JNE Reguler".to_string()),
        shipping_etd: Some("2 - 3".to_string()),
        gateway_order_id: None,
        payment_token: None,
        payment_transaction_id: None,
        shipment_id: None,
        waybill_id: None,
        tracking_status: None,
        tracking_url: None,
        lines: vec![OrderLineRecord {
            uuid: OrderLineUuid::new(),
            order_uuid: uuid,
            product_uuid: Some(ProductUuid::new()),
            product_name: "Kaos Polos".to_string(),
            variant_name: None,
            quantity: 1,
            price: 50_000,
            weight: 500,
        }],
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

/// The session `Set-Cookie` value of a response, whether still in the
/// response jar or already written to the headers.
pub(crate) fn session_set_cookie(res: &Response) -> Option<String> {
    res.cookie(SESSION_COOKIE).map(ToString::to_string).or_else(|| {
        res.headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find(|value| value.starts_with("store_auth_token="))
            .map(str::to_owned)
    })
}

const MULTIPART_BOUNDARY: &str = "bazaar-test-boundary";

/// A multipart body carrying a tiny image in the `file` field, with its
/// content type.
pub(crate) fn multipart_image(filename: &str) -> (String, Vec<u8>) {
    let mut body = format!(
        "--{MULTIPART_BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();

    body.extend_from_slice(&[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    body.extend_from_slice(format!("\r\n--{MULTIPART_BOUNDARY}--\r\n").as_bytes());

    (
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        body,
    )
}
