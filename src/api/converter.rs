//! Converter and formatter endpoints.
//!
//! Independent of the file item flow; they only show typed values
//! travelling to and from their text form.

use actix_web::{HttpResponse, get, post, web};
use chrono::Local;

use crate::models::{
    ConverterView, FormattedDateTime, FormatterForm, GroupedNumber, IpPort, IpPortForm,
};

fn default_ip_port() -> IpPort {
    IpPort::new("127.0.0.1", 8080)
}

/// Values rendered through their converters.
#[utoipa::path(
    get,
    path = "/converter/converter-view",
    tag = "Converter",
    responses(
        (status = 200, description = "Converted values", body = ConverterView)
    )
)]
#[get("/converter-view")]
pub async fn converter_view() -> HttpResponse {
    HttpResponse::Ok().json(ConverterView {
        number: 10_000.to_string(),
        ip_port: default_ip_port(),
    })
}

/// Edit form pre-filled with the default address.
#[utoipa::path(
    get,
    path = "/converter/edit",
    tag = "Converter",
    responses(
        (status = 200, description = "Current form values", body = IpPortForm)
    )
)]
#[get("/edit")]
pub async fn converter_form() -> HttpResponse {
    HttpResponse::Ok().json(IpPortForm {
        ip_port: default_ip_port(),
    })
}

/// Parse a submitted `ip:port` and echo it back.
#[utoipa::path(
    post,
    path = "/converter/edit",
    tag = "Converter",
    request_body(content = IpPortForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Parsed value", body = IpPortForm),
        (status = 400, description = "Malformed address")
    )
)]
#[post("/edit")]
pub async fn converter_edit(form: web::Form<IpPortForm>) -> HttpResponse {
    let form = form.into_inner();
    tracing::debug!("ip={}, port={}", form.ip_port.ip, form.ip_port.port);
    HttpResponse::Ok().json(form)
}

/// Formatter form pre-filled with a number and the current time.
#[utoipa::path(
    get,
    path = "/converter/formatter/edit",
    tag = "Converter",
    responses(
        (status = 200, description = "Formatted values", body = FormatterForm)
    )
)]
#[get("/formatter/edit")]
pub async fn formatter_form() -> HttpResponse {
    HttpResponse::Ok().json(FormatterForm {
        number: GroupedNumber(10_000),
        local_date_time: FormattedDateTime(Local::now().naive_local()),
    })
}

/// Parse formatted values and render them back in the same formats.
#[utoipa::path(
    post,
    path = "/converter/formatter/edit",
    tag = "Converter",
    request_body(content = FormatterForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Parsed values", body = FormatterForm),
        (status = 400, description = "Malformed number or timestamp")
    )
)]
#[post("/formatter/edit")]
pub async fn formatter_edit(form: web::Form<FormatterForm>) -> HttpResponse {
    HttpResponse::Ok().json(form.into_inner())
}

/// Configure converter routes under `/converter`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/converter")
            .service(converter_view)
            .service(converter_form)
            .service(converter_edit)
            .service(formatter_form)
            .service(formatter_edit),
    );
}
