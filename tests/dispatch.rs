//! End-to-end dispatch tests against a recording transport writer.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;

use ace::{
    App, BoxError, Error, Flow, Method, Request, Response, ResponseWriter, Router, StatusCode,
};

/// Transport stand-in: records serialized responses and close calls.
#[derive(Default)]
struct RecordingWriter {
    written: Vec<Response>,
    closed: bool,
    fail_writes: bool,
}

#[async_trait]
impl ResponseWriter for RecordingWriter {
    async fn serialize(&mut self, response: Response) -> Result<(), BoxError> {
        if self.fail_writes {
            return Err("connection reset".into());
        }
        self.written.push(response);
        Ok(())
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}

async fn root(_req: Request, mut res: Response) -> Result<Response, Error> {
    res.set_status(StatusCode::OK);
    Ok(res)
}

#[tokio::test]
async fn bare_route_gets_finalized_defaults() {
    let app = App::builder()
        .router(Router::new().on(Method::Get, "/", root).unwrap())
        .build();
    let mut writer = RecordingWriter::default();

    app.handle(Request::new(Method::Get, "/", true), &mut writer).await;

    assert_eq!(writer.written.len(), 1);
    let response = &writer.written[0];
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.content_type(), Some("text/html; charset=utf-8"));
    assert!(response.header("Server").is_some());
    assert_eq!(response.content_length(), Some(0));
    assert!(!writer.closed);
}

#[tokio::test]
async fn global_middleware_headers_reach_the_response() {
    async fn ping(_req: Request, mut res: Response) -> Result<Response, Error> {
        res.set_body("pong");
        Ok(res)
    }
    let app = App::builder()
        .middleware(ace::middleware::from_fn(
            |req: Request, mut res: Response| async move {
                res.set_header("X-Test", "1");
                Ok::<_, Error>(Flow::Continue(req, res))
            },
        ))
        .router(Router::new().on(Method::Get, "/ping", ping).unwrap())
        .build();
    let mut writer = RecordingWriter::default();

    app.handle(Request::new(Method::Get, "/ping", true), &mut writer).await;

    let response = &writer.written[0];
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("X-Test"), Some("1"));
    assert_eq!(response.body().as_bytes(), b"pong");
}

#[tokio::test]
async fn stopping_middleware_preempts_routing() {
    async fn handler(_req: Request, _res: Response) -> Result<Response, Error> {
        panic!("handler must not run");
    }
    let app = App::builder()
        .middleware(ace::middleware::from_fn(|_req: Request, _res: Response| async {
            Ok(Flow::Stop(Response::status(StatusCode::SERVICE_UNAVAILABLE)))
        }))
        .router(Router::new().on(Method::Get, "/", handler).unwrap())
        .build();
    let mut writer = RecordingWriter::default();

    app.handle(Request::new(Method::Get, "/", true), &mut writer).await;

    assert_eq!(writer.written.len(), 1);
    assert_eq!(writer.written[0].status_code(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn route_params_reach_the_handler() {
    async fn get_user(req: Request, _res: Response) -> Result<Response, Error> {
        let id = req.param("id").unwrap_or("missing").to_owned();
        Ok(Response::text(id))
    }
    let app = App::builder()
        .router(Router::new().on(Method::Get, "/users/:id", get_user).unwrap())
        .build();
    let mut writer = RecordingWriter::default();

    app.handle(Request::new(Method::Get, "/users/42", true), &mut writer).await;

    assert_eq!(writer.written[0].body().as_bytes(), b"42");
}

#[tokio::test]
async fn unmatched_request_reaches_the_error_handler() {
    let seen = Arc::new(Mutex::new(None));
    let seen_by_catch = Arc::clone(&seen);
    let app = App::builder()
        .router(Router::new().on(Method::Get, "/", root).unwrap())
        .catch(move |error: Error| {
            *seen_by_catch.lock().unwrap() = Some(error.to_string());
            Ok(Response::status(StatusCode::NOT_FOUND))
        })
        .build();
    let mut writer = RecordingWriter::default();

    app.handle(Request::new(Method::Get, "/missing", true), &mut writer).await;

    assert_eq!(writer.written[0].status_code(), StatusCode::NOT_FOUND);
    assert_eq!(
        seen.lock().unwrap().as_deref(),
        Some("no route matched `/missing`"),
    );
}

#[tokio::test]
async fn fallback_answers_when_no_error_handler_is_registered() {
    let app = App::builder()
        .router(Router::new().on(Method::Get, "/", root).unwrap())
        .build();
    let mut writer = RecordingWriter::default();

    app.handle(Request::new(Method::Post, "/", true), &mut writer).await;

    assert_eq!(writer.written.len(), 1);
    assert_eq!(writer.written[0].status_code(), StatusCode::NOT_FOUND);
    assert!(!writer.closed);
}

#[tokio::test]
async fn handler_errors_map_to_internal_server_error() {
    async fn broken(_req: Request, _res: Response) -> Result<Response, Error> {
        Err(Error::other("database gone"))
    }
    let app = App::builder()
        .router(Router::new().on(Method::Get, "/", broken).unwrap())
        .build();
    let mut writer = RecordingWriter::default();

    app.handle(Request::new(Method::Get, "/", true), &mut writer).await;

    assert_eq!(writer.written[0].status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn failing_error_handler_closes_without_a_response() {
    let app = App::builder()
        .catch(|error: Error| Err(error))
        .build();
    let mut writer = RecordingWriter::default();

    app.handle(Request::new(Method::Get, "/missing", true), &mut writer).await;

    assert!(writer.written.is_empty());
    assert!(writer.closed);
}

#[tokio::test]
async fn non_keep_alive_requests_close_after_serialization() {
    let app = App::builder()
        .router(Router::new().on(Method::Get, "/", root).unwrap())
        .build();
    let mut writer = RecordingWriter::default();

    app.handle(Request::new(Method::Get, "/", false), &mut writer).await;

    assert_eq!(writer.written.len(), 1);
    assert!(writer.closed);
}

#[tokio::test]
async fn unwritable_connection_is_closed() {
    let app = App::builder()
        .router(Router::new().on(Method::Get, "/", root).unwrap())
        .build();
    let mut writer = RecordingWriter { fail_writes: true, ..Default::default() };

    app.handle(Request::new(Method::Get, "/", true), &mut writer).await;

    assert!(writer.written.is_empty());
    assert!(writer.closed);
}

#[tokio::test]
async fn route_middleware_runs_after_global_chain() {
    async fn admin(_req: Request, mut res: Response) -> Result<Response, Error> {
        res.set_body("admin");
        Ok(res)
    }
    let deny = ace::middleware::from_fn(|req: Request, res: Response| async move {
        if req.storage().get::<bool>("authenticated").copied().unwrap_or(false) {
            Ok(Flow::Continue(req, res))
        } else {
            Ok(Flow::Stop(Response::status(StatusCode::UNAUTHORIZED)))
        }
    });
    let authenticate = ace::middleware::from_fn(|mut req: Request, res: Response| async move {
        req.storage_mut().set("authenticated", true);
        Ok::<_, Error>(Flow::Continue(req, res))
    });
    let app = App::builder()
        .middleware(authenticate)
        .router(
            Router::new()
                .on_with(Method::Get, "/admin", vec![Box::new(deny)], admin)
                .unwrap(),
        )
        .build();
    let mut writer = RecordingWriter::default();

    app.handle(Request::new(Method::Get, "/admin", true), &mut writer).await;

    assert_eq!(writer.written[0].body().as_bytes(), b"admin");
}

#[tokio::test]
async fn routers_are_consulted_in_registration_order() {
    async fn first(_req: Request, _res: Response) -> Result<Response, Error> {
        Ok(Response::text("first"))
    }
    async fn second(_req: Request, _res: Response) -> Result<Response, Error> {
        Ok(Response::text("second"))
    }
    let app = App::builder()
        .router(Router::new().on(Method::Get, "/dup", first).unwrap())
        .router(Router::new().on(Method::Get, "/dup", second).unwrap())
        .build();
    let mut writer = RecordingWriter::default();

    app.handle(Request::new(Method::Get, "/dup", true), &mut writer).await;

    assert_eq!(writer.written[0].body().as_bytes(), b"first");
}

#[tokio::test]
async fn static_middleware_short_circuits_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>hi</h1>").unwrap();

    let app = App::builder()
        .middleware(ace::middleware::ServeStatic::new(dir.path()))
        .router(Router::new().on(Method::Get, "/", root).unwrap())
        .build();
    let mut writer = RecordingWriter::default();

    app.handle(Request::new(Method::Get, "/index.html", true), &mut writer).await;

    let response = &writer.written[0];
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.content_type(), Some("text/html"));
    assert_eq!(response.body().as_bytes(), b"<h1>hi</h1>");
}

#[tokio::test]
async fn concurrent_requests_share_one_app() {
    async fn echo(req: Request, _res: Response) -> Result<Response, Error> {
        let id = req.param("id").unwrap_or("?").to_owned();
        Ok(Response::text(id))
    }
    let app = Arc::new(
        App::builder()
            .router(Router::new().on(Method::Get, "/echo/:id", echo).unwrap())
            .build(),
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    for id in 0..8 {
        let app = Arc::clone(&app);
        let tx = tx.clone();
        tokio::spawn(async move {
            let mut writer = RecordingWriter::default();
            let path = format!("/echo/{id}");
            app.handle(Request::new(Method::Get, path, true), &mut writer).await;
            let body = writer.written[0].body().as_bytes().to_vec();
            tx.send((id, body)).unwrap();
        });
    }
    drop(tx);

    let mut seen = 0;
    while let Some((id, body)) = rx.recv().await {
        assert_eq!(body, id.to_string().into_bytes());
        seen += 1;
    }
    assert_eq!(seen, 8);
}
