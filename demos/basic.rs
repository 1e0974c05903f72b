//! Minimal ace example — routing, middleware, error recovery, and a toy
//! transport writer standing in for a real connection.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! A real deployment implements `ResponseWriter` over its socket and calls
//! `app.handle` once per parsed inbound request. Here the writer just prints
//! what would have gone out on the wire.

use async_trait::async_trait;

use ace::{
    App, BoxError, Error, Flow, Method, Request, Response, ResponseWriter, Router, StatusCode,
};

/// Stand-in transport: prints responses instead of writing to a socket.
struct StdoutWriter;

#[async_trait]
impl ResponseWriter for StdoutWriter {
    async fn serialize(&mut self, response: Response) -> Result<(), BoxError> {
        println!(
            "{} | {} | {}",
            response.status_code(),
            response.content_type().unwrap_or("-"),
            String::from_utf8_lossy(response.body().as_bytes()),
        );
        Ok(())
    }

    async fn close(&mut self) {
        println!("(connection closed)");
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let router = Router::new()
        .on(Method::Get, "/users/:id", get_user)?
        .on(Method::Post, "/users", create_user)?;

    let app = App::builder()
        .middleware(ace::middleware::from_fn(
            |req: Request, mut res: Response| async move {
                res.set_header("X-Request-Tag", "demo");
                Ok::<_, Error>(Flow::Continue(req, res))
            },
        ))
        .router(router)
        .catch(|error: Error| match error {
            Error::RouteNotFound(_) => Ok(Response::status(StatusCode::NOT_FOUND)),
            _ => Ok(Response::status(StatusCode::INTERNAL_SERVER_ERROR)),
        })
        .build();

    let mut writer = StdoutWriter;
    app.handle(Request::new(Method::Get, "/users/42", true), &mut writer).await;
    app.handle(Request::new(Method::Post, "/users", true), &mut writer).await;
    // No route matches: the catch handler above maps it to a 404. The second
    // argument is the keep-alive flag, so this one also closes the connection.
    app.handle(Request::new(Method::Get, "/missing", false), &mut writer).await;

    Ok(())
}

// GET /users/:id
async fn get_user(req: Request, _res: Response) -> Result<Response, Error> {
    let id = req.param("id").unwrap_or("unknown");
    Ok(Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#)))
}

// POST /users
async fn create_user(_req: Request, _res: Response) -> Result<Response, Error> {
    Ok(Response::builder()
        .status(StatusCode::CREATED)
        .header("Location", "/users/99")
        .json(r#"{"id":"99","name":"new_user"}"#))
}
