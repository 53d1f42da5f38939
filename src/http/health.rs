use actix_web::web::Data;
use actix_web::{HttpResponse, Responder};
use fetcher_client::FetcherClient;
use std::sync::Arc;
use tracing::error;

pub(crate) async fn readiness_check(fetcher_client: Data<Arc<FetcherClient>>) -> impl Responder {
    if let Err(error) = fetcher_client.check_connection().await {
        error!(?error, "Readiness check failed");
    }

    HttpResponse::Ok().finish()
}
