//! In-memory stand-in for the products endpoint.
//!
//! Serves `GET /{version}/products{format}{;key=value...}?token=T` and
//! answers with the same status codes the real API uses for each failure, so
//! the client's classifier can be exercised end to end.

use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

pub const API_VERSION: &str = "1.0";
pub const DEMO_TOKEN: &str = "6523B0E2C339018570FF54856DF193523332D60F";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsPage {
    pub product_header: ProductHeader,
    pub products: Vec<Product>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductHeader {
    pub total_hits: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub categories: Vec<Category>,
    pub offers: Vec<Offer>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub program_name: String,
    pub product_url: String,
    pub price_history: Vec<PriceEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub price: Price,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub value: String,
    pub currency: String,
}

/// How the server reads list values.
///
/// Scalars and lists look the same on the wire, so the server is told which
/// list policy its clients use instead of guessing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListEncoding {
    /// Value decoded once, then split on `,`.
    #[default]
    Single,
    /// Value decoded once, split on `,`, and each element decoded again.
    Double,
}

/// Shared server state. Clones share the offline switch.
#[derive(Clone)]
pub struct Catalog {
    token: Arc<str>,
    products: Arc<Vec<Product>>,
    offline: Arc<AtomicBool>,
    list_encoding: ListEncoding,
}

impl Catalog {
    pub fn new(token: &str, products: Vec<Product>) -> Self {
        Self {
            token: token.into(),
            products: Arc::new(products),
            offline: Arc::new(AtomicBool::new(false)),
            list_encoding: ListEncoding::Single,
        }
    }

    pub fn with_list_encoding(mut self, encoding: ListEncoding) -> Self {
        self.list_encoding = encoding;
        self
    }

    /// Five products across three categories, guarded by [`DEMO_TOKEN`].
    pub fn demo() -> Self {
        Self::new(
            DEMO_TOKEN,
            vec![
                product("1", "Trail running shoes", "Shoes", "89.90"),
                product("2", "Leather boots", "Shoes", "149.00"),
                product("3", "Garden hose 20m", "Home & Garden", "24.50"),
                product("4", "Wooden train set", "Toys", "39.99"),
                product("5", "Running socks", "Sport", "9.95"),
            ],
        )
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn is_offline(&self) -> bool {
        self.offline.load(Ordering::SeqCst)
    }
}

fn product(id: &str, name: &str, category: &str, price: &str) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        description: format!("{name} from the demo catalog"),
        categories: vec![Category {
            name: category.to_string(),
        }],
        offers: vec![Offer {
            program_name: "Demo Shop".to_string(),
            product_url: format!("https://shop.example/products/{id}"),
            price_history: vec![PriceEntry {
                price: Price {
                    value: price.to_string(),
                    currency: "EUR".to_string(),
                },
            }],
        }],
    }
}

pub fn app() -> Router {
    app_with(Catalog::demo())
}

pub fn app_with(catalog: Catalog) -> Router {
    Router::new().fallback(search_products).with_state(catalog)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, Catalog::demo()).await
}

pub async fn serve(listener: TcpListener, catalog: Catalog) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(catalog)).await
}

type Rejection = (StatusCode, &'static str);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Json,
    Xml,
}

async fn search_products(
    State(catalog): State<Catalog>,
    method: Method,
    uri: Uri,
) -> Result<Response, Rejection> {
    debug!(%method, path = uri.path(), "products request");

    if method != Method::GET {
        return Err((StatusCode::METHOD_NOT_ALLOWED, "only GET is supported"));
    }
    if catalog.is_offline() {
        return Err((StatusCode::INTERNAL_SERVER_ERROR, "service offline"));
    }

    let (format, params) = parse_route(uri.path())?;

    let token = uri
        .query()
        .and_then(|q| q.split('&').find_map(|pair| pair.strip_prefix("token=")));
    if token != Some(&*catalog.token) {
        return Err((StatusCode::FORBIDDEN, "invalid token"));
    }

    let filters = parse_filters(params, catalog.list_encoding)?;
    let page = search(&catalog.products, &filters)?;

    Ok(match format {
        Format::Json => Json(page).into_response(),
        Format::Xml => ([(header::CONTENT_TYPE, "application/xml")], render_xml(&page)?).into_response(),
    })
}

/// Split `/{version}/products{format}{;params}` into format and raw params.
fn parse_route(path: &str) -> Result<(Format, &str), Rejection> {
    const NOT_FOUND: Rejection = (StatusCode::NOT_FOUND, "no such resource");

    let (version, rest) = path.trim_start_matches('/').split_once('/').ok_or(NOT_FOUND)?;
    if version != API_VERSION {
        return Err(NOT_FOUND);
    }
    let (resource, params) = rest.split_once(';').unwrap_or((rest, ""));
    let format = match resource.strip_prefix("products").ok_or(NOT_FOUND)? {
        "" | ".json" => Format::Json,
        ".xml" => Format::Xml,
        other if other.starts_with('.') => {
            return Err((StatusCode::NOT_ACCEPTABLE, "unsupported response format"))
        }
        _ => return Err(NOT_FOUND),
    };
    Ok((format, params))
}

/// Values are decoded once and split on commas. Under
/// [`ListEncoding::Double`] each element is decoded a second time.
fn parse_filters(params: &str, encoding: ListEncoding) -> Result<Vec<(String, Vec<String>)>, Rejection> {
    const BAD: Rejection = (StatusCode::BAD_REQUEST, "malformed query key");

    params
        .split(';')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').ok_or(BAD)?;
            let once = urlencoding::decode(value).map_err(|_| BAD)?;
            let values = once
                .split(',')
                .map(|item| match encoding {
                    ListEncoding::Single => Ok(item.to_string()),
                    ListEncoding::Double => urlencoding::decode(item).map(Cow::into_owned).map_err(|_| BAD),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((key.to_string(), values))
        })
        .collect()
}

fn search(products: &[Product], filters: &[(String, Vec<String>)]) -> Result<ProductsPage, Rejection> {
    let mut hits: Vec<&Product> = products.iter().collect();
    let mut page_size = None;

    for (key, values) in filters {
        match key.as_str() {
            "q" => {
                let needle = values.join(",").to_lowercase();
                hits.retain(|p| p.name.to_lowercase().contains(&needle));
            }
            "category" => hits.retain(|p| {
                p.categories
                    .iter()
                    .any(|c| values.iter().any(|v| v.eq_ignore_ascii_case(&c.name)))
            }),
            "id" => hits.retain(|p| values.contains(&p.id)),
            "pageSize" => {
                let size = values
                    .join(",")
                    .parse::<usize>()
                    .map_err(|_| (StatusCode::BAD_REQUEST, "pageSize must be a number"))?;
                page_size = Some(size);
            }
            _ => {}
        }
    }

    let total_hits = hits.len() as u64;
    if let Some(size) = page_size {
        hits.truncate(size);
    }
    Ok(ProductsPage {
        product_header: ProductHeader { total_hits },
        products: hits.into_iter().cloned().collect(),
    })
}

fn render_xml(page: &ProductsPage) -> Result<String, Rejection> {
    const FAILED: Rejection = (StatusCode::INTERNAL_SERVER_ERROR, "xml rendering failed");

    let mut xml = String::from(XML_DECLARATION);
    let serializer = quick_xml::se::Serializer::with_root(&mut xml, Some("result")).map_err(|_| FAILED)?;
    page.serialize(serializer).map_err(|_| FAILED)?;
    Ok(xml)
}
