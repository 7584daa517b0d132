use crate::http::{ApiError, UrlsRequest};
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use request_processors::BatchAggregator;

pub(crate) async fn process_urls(
    batch_aggregator: Data<BatchAggregator>,
    body: Json<UrlsRequest>,
) -> Result<HttpResponse, ApiError> {
    let buckets = batch_aggregator.aggregate(body.into_inner().urls).await?;

    Ok(HttpResponse::Ok().json(buckets))
}
