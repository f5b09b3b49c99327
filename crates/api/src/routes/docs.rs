//! API documentation endpoints.

use axum::Json;
use axum::response::Html;
use serde_json::{Value, json};

/// GET /docs/openapi.json: returns the OpenAPI description of this API.
pub async fn openapi() -> Json<Value> {
    Json(openapi_document())
}

/// GET /docs: returns a browsable HTML summary of the OpenAPI document.
pub async fn page() -> Html<String> {
    Html(render_page(&openapi_document()))
}

const PAGE_STYLE: &str = "\
body { font-family: Arial, sans-serif; margin: 20px; }
h1 { color: #333; }
.endpoint { margin-top: 20px; padding: 10px; background: #f5f5f5; border-left: 4px solid #0066cc; }
.get { border-left-color: #61affe; }
.post { border-left-color: #49cc90; }
.method { font-weight: bold; padding: 3px 8px; border-radius: 3px; display: inline-block; width: 50px; text-align: center; color: white; }
.get .method { background: #61affe; }
.post .method { background: #49cc90; }
code { background: #f0f0f0; padding: 2px 6px; border-radius: 3px; }";

fn render_page(doc: &Value) -> String {
    let title = doc["info"]["title"].as_str().unwrap_or("API");
    let mut endpoints = String::new();

    if let Some(paths) = doc["paths"].as_object() {
        for (path, operations) in paths {
            let Some(operations) = operations.as_object() else {
                continue;
            };
            for (method, operation) in operations {
                let summary = operation["summary"].as_str().unwrap_or_default();
                let mut statuses: Vec<&str> = operation["responses"]
                    .as_object()
                    .map(|r| r.keys().map(String::as_str).collect())
                    .unwrap_or_default();
                statuses.sort_unstable();

                endpoints.push_str(&format!(
                    "<div class=\"endpoint {method}\">\
                     <span class=\"method\">{}</span> <code>{path}</code>\
                     <p>{summary}</p><p>Responses: {}</p></div>\n",
                    method.to_uppercase(),
                    statuses.join(", "),
                ));
            }
        }
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>{title} - OpenAPI Documentation</title>\n\
         <style>\n{PAGE_STYLE}\n</style>\n</head>\n<body>\n<h1>{title}</h1>\n\
         <p>Machine-readable document: <a href=\"/docs/openapi.json\"><code>/docs/openapi.json</code></a></p>\n\
         {endpoints}</body>\n</html>\n"
    )
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/Error" }
            }
        }
    })
}

pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Order Management API",
            "description": "Lists products and places orders against a shared stock pool",
            "version": env!("CARGO_PKG_VERSION"),
        },
        "paths": {
            "/health": {
                "get": {
                    "summary": "Health check",
                    "tags": ["Health"],
                    "responses": { "200": { "description": "Server is healthy" } }
                }
            },
            "/products": {
                "get": {
                    "summary": "List all products",
                    "tags": ["Products"],
                    "responses": {
                        "200": {
                            "description": "List of products",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "array",
                                        "items": { "$ref": "#/components/schemas/Product" }
                                    }
                                }
                            }
                        },
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/orders": {
                "post": {
                    "summary": "Place an order",
                    "description": "Checks stock and creates the order and its items in one transaction",
                    "tags": ["Orders"],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/CreateOrderRequest" }
                            }
                        }
                    },
                    "responses": {
                        "201": {
                            "description": "Order created",
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/Order" }
                                }
                            }
                        },
                        "400": error_response("Missing or invalid customer_id or items"),
                        "404": error_response("Product not found"),
                        "409": error_response("Insufficient product stock"),
                        "500": error_response("Internal server error"),
                        "504": error_response("Order placement timed out")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Product": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "name": { "type": "string" },
                        "price_in_minor_units": { "type": "integer" },
                        "quantity": { "type": "integer" },
                        "created_at": { "type": "string", "format": "date-time" }
                    }
                },
                "CreateOrderRequest": {
                    "type": "object",
                    "required": ["customer_id", "items"],
                    "properties": {
                        "customer_id": { "type": "integer" },
                        "items": {
                            "type": "array",
                            "minItems": 1,
                            "items": {
                                "type": "object",
                                "required": ["product_id", "quantity"],
                                "properties": {
                                    "product_id": { "type": "integer" },
                                    "quantity": { "type": "integer", "minimum": 1 }
                                }
                            }
                        }
                    }
                },
                "Order": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "customer_id": { "type": "integer" },
                        "created_at": { "type": "string", "format": "date-time" }
                    }
                },
                "Error": {
                    "type": "object",
                    "properties": { "error": { "type": "string" } }
                }
            }
        }
    })
}
