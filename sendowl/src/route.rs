use hyper::Method;
use sendowl_models::id::{OrderId, ProductId};

use crate::options::Endpoints;

#[derive(Clone, Copy, Debug)]
pub enum Route {
    ListSubscriptions,
    ListProducts,
    GetProduct { product_id: ProductId },
    CreateProduct,
    UpdateProduct { product_id: ProductId },
    DeleteProduct { product_id: ProductId },
    CheckLicense { product_id: ProductId },
    ListLicenses { product_id: ProductId },
    GetOrder { order_id: OrderId },
}

impl Route {
    pub fn method(self) -> Method {
        match self {
            Route::CreateProduct => Method::POST,
            Route::UpdateProduct { .. } => Method::PUT,
            Route::DeleteProduct { .. } => Method::DELETE,
            Route::ListSubscriptions
            | Route::ListProducts
            | Route::GetProduct { .. }
            | Route::CheckLicense { .. }
            | Route::ListLicenses { .. }
            | Route::GetOrder { .. } => Method::GET,
        }
    }

    /// The URL of the route, without its query.
    pub fn url(self, endpoints: &Endpoints) -> String {
        match self {
            Route::ListSubscriptions => endpoints.subscriptions.clone(),
            Route::ListProducts => format!("{}/", endpoints.products),
            Route::GetProduct { product_id }
            | Route::UpdateProduct { product_id }
            | Route::DeleteProduct { product_id } => {
                format!("{}/{product_id}", endpoints.products)
            }
            Route::CreateProduct => endpoints.upload.clone(),
            Route::CheckLicense { product_id } => {
                format!("{}/{product_id}/licenses/check_valid", endpoints.products)
            }
            Route::ListLicenses { product_id } => {
                format!("{}/{product_id}/licenses/", endpoints.products)
            }
            Route::GetOrder { order_id } => format!("{}/{order_id}", endpoints.orders),
        }
    }
}
