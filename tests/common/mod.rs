#![allow(dead_code)]

use chrono::NaiveDate;
use httpmock::{Method::GET, Mock, MockServer};
use lsrscraper::Config;
use std::{path::Path, time::Duration};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub const RAW_HEADER: &str = "Time,Size,Location,County,State,Lat,Lon,Comments";

pub fn init_test_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,lsrscraper=debug")),
        )
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Config pointed at `base_url` with fast retries.
pub fn config(work_dir: &Path, base_url: &str, start: NaiveDate, end: NaiveDate) -> Config {
    Config::new(work_dir, start, end)
        .unwrap()
        .with_base_url(base_url)
        .unwrap()
        .with_workers(4)
        .with_retry(3, Duration::from_millis(1))
}

pub fn mock_config(server: &MockServer, work_dir: &Path, start: NaiveDate, end: NaiveDate) -> Config {
    config(work_dir, &format!("{}/", server.base_url()), start, end)
}

pub fn mock_csv<'a>(server: &'a MockServer, name: &str, body: &str) -> Mock<'a> {
    let path = format!("/{}", name);
    server.mock(|when, then| {
        when.method(GET).path(path.as_str());
        then.status(200).header("content-type", "text/csv").body(body);
    })
}

pub fn mock_status<'a>(server: &'a MockServer, name: &str, status: u16) -> Mock<'a> {
    let path = format!("/{}", name);
    server.mock(|when, then| {
        when.method(GET).path(path.as_str());
        then.status(status).body("Not Found");
    })
}

pub fn mock_html<'a>(server: &'a MockServer, name: &str, body: &str) -> Mock<'a> {
    let path = format!("/{}", name);
    server.mock(|when, then| {
        when.method(GET).path(path.as_str());
        then.status(200).header("content-type", "text/html").body(body);
    })
}

/// An SPC-style daily page with the given hail rows, each
/// `[time, size, location, county, state, lat, lon, comments]`.
pub fn report_page(rows: &[[&str; 8]]) -> String {
    let mut html = String::from(
        "<html><body><table>\n<tr><th>Time</th><th>Size</th><th>Location</th><th>County</th>\
         <th>State</th><th>Lat</th><th>Lon</th><th>Comments</th></tr>\n",
    );
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table></body></html>");
    html
}
