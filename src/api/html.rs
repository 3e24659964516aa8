use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    http::{
        header::{COOKIE, SET_COOKIE},
        request::Parts,
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{Html, IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use tracing::debug;

use super::{found, log_internal, Credentials, ItemInput, Presentation};
use crate::auth::SessionToken;
use crate::config::SessionConfig;
use crate::database::Item;
use crate::error::AppError;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "session";

const SIGNIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <form method="POST" action="/signin">
    Email: <input type="text" name="email"><br>
    Password: <input type="password" name="password"><br>
    <input type="submit" value="Sign in">
  </form>
</body>
</html>
"#;

const NEW_ITEM_PAGE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <form method="POST" action="/items">
    Name: <input type="text" name="name"><br>
    Price: <input type="text" name="price"><br>
    <input type="submit" value="Create">
  </form>
</body>
</html>
"#;

/// Server-rendered pages, session token carried in a cookie
#[derive(Debug, Clone, Default)]
pub struct HtmlPresentation {
    session: SessionConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ItemForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    price: String,
}

impl HtmlPresentation {
    pub fn new(session: SessionConfig) -> Self {
        Self { session }
    }

    fn session_cookie(&self, token: SessionToken) -> String {
        let mut cookie = format!("{}={}; Path=/; SameSite=Lax", SESSION_COOKIE, token);
        if self.session.cookie_http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.session.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

#[async_trait]
impl Presentation for HtmlPresentation {
    fn name(&self) -> &'static str {
        "html"
    }

    fn serves_forms(&self) -> bool {
        true
    }

    fn presented_credential(&self, parts: &Parts) -> Option<String> {
        cookie_value(&parts.headers, SESSION_COOKIE)
    }

    async fn parse_credentials(&self, request: Request) -> Credentials {
        match Form::<Credentials>::from_request(request, &()).await {
            Ok(Form(credentials)) => credentials,
            Err(rejection) => {
                debug!("Unreadable sign-in form: {}", rejection);
                Credentials::default()
            }
        }
    }

    async fn parse_item(&self, request: Request) -> Result<ItemInput, AppError> {
        let form = match Form::<ItemForm>::from_request(request, &()).await {
            Ok(Form(form)) => form,
            Err(rejection) => {
                debug!("Unreadable item form: {}", rejection);
                ItemForm::default()
            }
        };
        let price = form
            .price
            .parse::<i64>()
            .map_err(|_| AppError::validation("Invalid price", "price"))?;
        Ok(ItemInput { name: form.name, price })
    }

    fn signin_form(&self) -> Response {
        Html(SIGNIN_PAGE).into_response()
    }

    fn new_item_form(&self) -> Response {
        Html(NEW_ITEM_PAGE).into_response()
    }

    fn signed_in(&self, token: SessionToken) -> Response {
        let mut response = found("/items");
        match HeaderValue::from_str(&self.session_cookie(token)) {
            Ok(cookie) => {
                response.headers_mut().insert(SET_COOKIE, cookie);
            }
            Err(e) => return self.error(AppError::internal(format!("session cookie: {}", e))),
        }
        response
    }

    fn items(&self, items: &[Item]) -> Response {
        let mut list = String::new();
        for item in items {
            list.push_str(&format!(
                "    <li>{}: <b>{}VNĐ</b></li>\n",
                escape_html(&item.name),
                item.price
            ));
        }
        Html(format!(
            "<!DOCTYPE html>\n<html>\n<body>\n  <ul>\n{}  </ul>\n  <a href=\"/items/new\">New item</a>\n</body>\n</html>\n",
            list
        ))
        .into_response()
    }

    fn created(&self, _item: &Item) -> Response {
        found("/items")
    }

    fn error(&self, err: AppError) -> Response {
        log_internal(self.name(), &err);
        match err {
            AppError::NotFound | AppError::AuthenticationFailed | AppError::Unauthorized => {
                found("/signin")
            }
            AppError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, err.message().to_string()).into_response()
            }
            AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.message().to_string()).into_response()
            }
        }
    }
}

/// First value of the named cookie across all `Cookie` headers
fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
