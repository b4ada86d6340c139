//! Test Helpers

use testresult::TestResult;

use crate::{
    domain::{
        accounts::{
            AccountsService, AccountsServiceError,
            data::NewAccount,
            records::{AccountRecord, AccountUuid},
        },
        carts::{CartsService, CartsServiceError, data::NewCartLine, records::CartLineRecord},
        orders::{OrdersService, data::NewOrder, records::OrderRecord},
        products::{ProductsService, data::NewProduct},
    },
    test::TestContext,
};

pub(crate) fn new_account(email: &str) -> NewAccount {
    NewAccount {
        name: "Ana Lestari".to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        phone: "08123456789".to_string(),
        ..NewAccount::default()
    }
}

pub(crate) fn new_product(name: &str, price: u64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        price,
        stock: 10,
        ..NewProduct::default()
    }
}

pub(crate) async fn create_buyer(
    ctx: &TestContext,
    email: &str,
) -> Result<AccountRecord, AccountsServiceError> {
    ctx.accounts.register(new_account(email)).await
}

pub(crate) async fn create_seller(
    ctx: &TestContext,
    email: &str,
) -> Result<AccountRecord, AccountsServiceError> {
    ctx.accounts
        .create_seller(NewAccount {
            name: "Toko Ana".to_string(),
            ..new_account(email)
        })
        .await
}

pub(crate) async fn add_line(
    ctx: &TestContext,
    account: AccountUuid,
    product_slug: &str,
    variant_name: Option<&str>,
    quantity: i32,
) -> Result<CartLineRecord, CartsServiceError> {
    ctx.carts
        .add_line(
            account,
            NewCartLine {
                product_slug: product_slug.to_string(),
                variant_name: variant_name.map(str::to_string),
                quantity,
            },
        )
        .await
}

/// Check out a single 50 000 line with a 15 000 JNE REG shipping estimate.
pub(crate) async fn place_order(
    ctx: &TestContext,
    buyer: &AccountRecord,
) -> TestResult<OrderRecord> {
    let product = ctx.products.create_product(new_product("Kaos", 50_000)).await?;

    add_line(ctx, buyer.uuid, &product.slug, None, 1).await?;

    let order = ctx
        .orders
        .create_order(
            buyer.clone(),
            NewOrder {
                shipping_address: Some("Jl. Melati No. 5, Bandung".to_string()),
                destination_area_id: Some("IDNP9IDNC74IDND846IDZ40115".to_string()),
                destination_postal_code: Some("40115".to_string()),
                courier_company: Some("jne".to_string()),
                courier_type: Some("reg".to_string()),
                courier_service_name: Some("JNE Reguler".to_string()),
                shipping_cost: 15_000,
                ..NewOrder::default()
            },
        )
        .await?;

    Ok(order)
}
