//! App Router

use salvo::Router;

use crate::{auth, carts, orders, payments, products, settings, shipping};

/// Every JSON endpoint, behind the session middleware.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("auth")
                .push(Router::with_path("register").post(auth::register::handler))
                .push(Router::with_path("login").post(auth::login::handler))
                .push(Router::with_path("logout").post(auth::logout::handler))
                .push(Router::with_path("me").get(auth::me::handler))
                .push(Router::with_path("change-password").post(auth::change_password::handler))
                .push(Router::with_path("change-email").post(auth::change_email::handler)),
        )
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{slug}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler)
                        .push(
                            Router::with_path("images")
                                .post(products::add_image::handler)
                                .push(
                                    Router::with_path("{image}")
                                        .delete(products::delete_image::handler),
                                ),
                        ),
                ),
        )
        .push(Router::with_path("categories").get(products::categories::handler))
        .push(Router::with_path("upload-image").post(products::upload::handler))
        .push(
            Router::with_path("settings")
                .get(settings::get::handler)
                .put(settings::update::handler),
        )
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .delete(carts::clear::handler)
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .push(Router::with_path("{line}").put(carts::items::update::handler)),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("status").put(orders::update_status::handler)),
                ),
        )
        .push(
            Router::with_path("payment")
                .push(Router::with_path("client-key").get(payments::client_key::handler))
                .push(Router::with_path("token").post(payments::token::handler))
                .push(Router::with_path("status/{order}").get(payments::status::handler))
                .push(Router::with_path("notification").post(payments::notification::handler)),
        )
        .push(
            Router::with_path("shipping")
                .push(Router::with_path("status").get(shipping::availability::handler))
                .push(Router::with_path("areas").get(shipping::areas::handler))
                .push(Router::with_path("rates").post(shipping::rates::handler))
                .push(
                    Router::with_path("origin")
                        .get(shipping::get_origin::handler)
                        .put(shipping::update_origin::handler),
                )
                .push(
                    Router::with_path("orders/{order}")
                        .push(Router::with_path("shipment").post(shipping::shipment::handler))
                        .push(Router::with_path("tracking").get(shipping::tracking::handler)),
                ),
        )
}
