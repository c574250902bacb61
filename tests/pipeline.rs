mod common;

use common::*;
use httpmock::MockServer;
use lsrscraper::{fetch_all, normalize, process::CANONICAL_HEADER};
use std::fs;
use tempfile::tempdir;

fn output_records(path: &std::path::Path) -> Vec<csv::StringRecord> {
    csv::Reader::from_path(path)
        .unwrap()
        .records()
        .map(|r| r.unwrap())
        .collect()
}

#[tokio::test]
async fn download_then_preprocess() {
    init_test_logging();
    let server = MockServer::start();
    let tmp = tempdir().unwrap();
    let cfg = mock_config(&server, tmp.path(), ymd(2020, 4, 26), ymd(2020, 4, 28));

    // 26th: published CSV with one good and one bad row
    let csv_body = format!(
        "{}\n1510,175,3 N Sayre,Beckham,OK,35.34,-99.64,(OUN)\n1512,UNK,Nowhere,Beckham,OK,35.3,-99.6,(OUN)\n",
        RAW_HEADER
    );
    mock_csv(&server, "200426_rpts_hail.csv", &csv_body);
    // 27th: scraped
    mock_status(&server, "200427_rpts_hail.csv", 404);
    mock_html(
        &server,
        "200427_rpts.html",
        &report_page(&[["1530", "100", "DOWNTOWN", "ANYCOUNTY", "OK", "3550", "9720", "golf ball size"]]),
    );
    // 28th: nothing at all
    mock_status(&server, "200428_rpts_hail.csv", 404);
    mock_html(&server, "200428_rpts.html", &report_page(&[]));

    let fetched = fetch_all(&cfg).await.unwrap();
    assert_eq!(fetched.written, 2);
    assert_eq!(fetched.skipped_empty, 1);

    let summary = normalize(&cfg).unwrap();
    assert_eq!(summary.files, 2);
    assert_eq!(summary.written, 2);
    assert_eq!(summary.skipped, 1);

    let mut reader = csv::Reader::from_path(cfg.output_path()).unwrap();
    assert_eq!(
        reader.headers().unwrap().iter().collect::<Vec<_>>(),
        CANONICAL_HEADER.to_vec()
    );

    let mut rows = output_records(&cfg.output_path());
    rows.sort_by(|a, b| a[0].cmp(&b[0]));
    assert_eq!(
        rows[0].iter().collect::<Vec<_>>(),
        vec![
            "2020-04-27 03:10:00+00:00",
            "2020-04-26 15:10:00-12:00",
            "1.75",
            "3 N Sayre",
            "Beckham",
            "OK",
            "35.34",
            "-99.64",
            "(OUN)",
        ]
    );
    assert_eq!(
        rows[1].iter().collect::<Vec<_>>(),
        vec![
            "2020-04-28 03:30:00+00:00",
            "2020-04-27 15:30:00-12:00",
            "1.00",
            "DOWNTOWN",
            "ANYCOUNTY",
            "OK",
            "35.5",
            "-97.2",
            "golf ball size",
        ]
    );
}

#[test]
fn written_plus_skipped_matches_data_lines() {
    let tmp = tempdir().unwrap();
    let day = ymd(2011, 4, 27);
    let cfg = config(tmp.path(), "http://127.0.0.1:1/", day, day);
    fs::create_dir_all(cfg.raw_dir()).unwrap();

    let artifacts = [
        (
            "hail_reports_20110426.csv",
            vec![
                "1200,100,A,B,TX,32.1,-97.1,ok",
                "",
                "1201,100,A,B,TX,32.1,-197.1,bad lon",
                "1202,abc,A,B,TX,32.1,-97.1,bad size",
            ],
        ),
        (
            "hail_reports_20110427.csv",
            vec![
                "2015,275,CULLMAN,CULLMAN,AL,34.17,-86.84,(BMX)",
                "2016,275,CULLMAN,CULLMAN,AL,34.17,-86.84,(BMX)",
                "9999,275,CULLMAN,CULLMAN,AL,34.17,-86.84,bad time",
                "short,row",
                "2018,150,,CULLMAN,AL,3417,8684,encoded coords",
            ],
        ),
    ];

    let mut data_lines = 0;
    for (name, lines) in &artifacts {
        let mut body = format!("{}\n", RAW_HEADER);
        for line in lines {
            body.push_str(line);
            body.push('\n');
            if !line.trim().is_empty() {
                data_lines += 1;
            }
        }
        fs::write(cfg.raw_dir().join(name), body).unwrap();
    }

    let summary = normalize(&cfg).unwrap();

    assert_eq!(summary.written + summary.skipped, data_lines);
    assert_eq!(summary.written, 4);
    assert_eq!(summary.skipped, 4);

    for row in output_records(&cfg.output_path()) {
        let lat: f64 = row[6].parse().unwrap();
        let lon: f64 = row[7].parse().unwrap();
        assert!(24.0 < lat && lat < 50.0, "lat {}", lat);
        assert!(-125.0 < lon && lon < -66.0, "lon {}", lon);
    }
}
