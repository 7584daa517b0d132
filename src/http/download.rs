use crate::http::{ApiError, UrlsRequest};
use actix_web::web::{Data, Json};
use actix_web::HttpResponse;
use request_processors::DownloadOrchestrator;
use tokio_util::io::ReaderStream;

const STREAM_BUFFER_SIZE: usize = 16 * 1024;

/// Streams the combined tool output. Validation is the only failure reported
/// through the status code; everything later arrives as lines in the body.
pub(crate) async fn download(
    download_orchestrator: Data<DownloadOrchestrator>,
    body: Json<UrlsRequest>,
) -> Result<HttpResponse, ApiError> {
    let urls = body.into_inner().urls;
    DownloadOrchestrator::validate(&urls)?;

    let (writer, reader) = tokio::io::duplex(STREAM_BUFFER_SIZE);
    let orchestrator = download_orchestrator.into_inner();

    actix_rt::spawn(async move {
        orchestrator.stream_downloads(urls, writer).await;
    });

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header(("X-Content-Type-Options", "nosniff"))
        .streaming(ReaderStream::new(reader)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::json_config;
    use actix_web::{test, web, App};
    use request_processors::DownloadCommandFactory;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tokio::process::Command;

    struct EchoCommands;

    impl DownloadCommandFactory for EchoCommands {
        fn command(&self, url: &str) -> Command {
            let mut command = Command::new("sh");
            command.arg("-c").arg(format!(
                "echo downloading {}; case {} in *fail*) exit 1;; esac",
                url, url
            ));
            command
        }
    }

    fn app_data() -> Data<DownloadOrchestrator> {
        Data::new(DownloadOrchestrator::new(Arc::new(EchoCommands), None))
    }

    #[actix_rt::test]
    async fn test_download_stream() {
        let app = test::init_service(
            App::new()
                .app_data(app_data())
                .app_data(json_config())
                .route("/download", web::post().to(download)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/download")
            .set_json(json!({"urls": ["track-ok", "track-fail"]}))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(200, response.status().as_u16());
        assert_eq!(
            "text/plain; charset=utf-8",
            response.headers().get("Content-Type").unwrap()
        );

        let body = test::read_body(response).await;
        let body = String::from_utf8(body.to_vec()).unwrap();
        let lines = body.lines().collect::<Vec<_>>();

        assert_eq!("Number of workers: 2", lines[0]);
        assert_eq!("All downloads completed", lines[lines.len() - 1]);
        assert!(lines.contains(&"[track-ok] downloading track-ok"));
        assert!(lines.contains(&"[track-fail] downloading track-fail"));
        assert!(lines.contains(&"Download completed successfully for URL track-ok"));
        assert_eq!(
            1,
            lines
                .iter()
                .filter(|line| line.starts_with("Download failed for URL track-fail: "))
                .count()
        );
    }

    #[actix_rt::test]
    async fn test_empty_download_request_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(app_data())
                .app_data(json_config())
                .route("/download", web::post().to(download)),
        )
        .await;

        let request = test::TestRequest::post()
            .uri("/download")
            .set_json(json!({"urls": []}))
            .to_request();
        let response = test::call_service(&app, request).await;

        assert_eq!(400, response.status().as_u16());

        let body: Value = test::read_body_json(response).await;
        assert_eq!(json!({"error": "No URLs provided"}), body);
    }
}
