mod common;

use assert_cmd::Command;
use encoding_rs::UTF_8;
use predicates::str::contains;

use sheet_insights::{
    data::Value,
    error::LoadError,
    upload::{LoadOptions, load_path},
};

use common::TestWorkspace;

fn options() -> LoadOptions<'static> {
    LoadOptions {
        content_type: None,
        delimiter: None,
        encoding: UTF_8,
    }
}

#[test]
fn workbook_with_header_keeps_cell_types() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_xlsx(
        "sales.xlsx",
        &[
            &[Some("region"), Some("units")],
            &[Some("north"), Some("12")],
            &[Some("south"), Some("7.5")],
        ],
    );
    let upload = load_path(&path, &options()).expect("load workbook");
    assert_eq!(upload.filename, "sales.xlsx");
    assert_eq!(upload.table.columns, vec!["region", "units"]);
    assert_eq!(upload.table.rows[0].get("units"), Some(&Value::Number(12.0)));
    assert_eq!(upload.table.rows[1].display("units"), "7.5");
}

#[test]
fn workbook_with_blank_header_cells_gets_positional_names() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_xlsx(
        "grid.xlsx",
        &[
            &[Some("label"), None, Some("total")],
            &[Some("a"), Some("1"), Some("2")],
            &[Some("b"), None, Some("4")],
        ],
    );
    let upload = load_path(&path, &options()).expect("load workbook");
    assert_eq!(upload.table.columns, vec!["label", "Column2", "total"]);
    assert_eq!(upload.table.rows[1].display("Column2"), "");
}

#[test]
fn header_only_workbook_is_empty_sheet() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_xlsx("header.xlsx", &[&[Some("a"), Some("b")]]);
    let err = load_path(&path, &options()).expect_err("no data rows");
    let load_error = err.downcast_ref::<LoadError>().expect("load error");
    assert!(matches!(load_error, LoadError::EmptySheet { .. }));
    assert!(load_error.remediation().contains("macros"));
}

#[test]
fn whitespace_only_rows_leave_an_empty_sheet() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_xlsx(
        "blank.xlsx",
        &[&[Some("a"), Some("b")], &[Some(" "), None]],
    );
    let err = load_path(&path, &options()).expect_err("only blank rows");
    let load_error = err.downcast_ref::<LoadError>().expect("load error");
    assert!(matches!(load_error, LoadError::EmptySheet { .. }));
}

#[test]
fn corrupt_workbook_exits_with_input_error() {
    let workspace = TestWorkspace::new();
    let path = workspace.write("broken.xlsx", b"PK\x03\x04 definitely not a workbook");
    Command::cargo_bin("sheet-insights")
        .expect("binary exists")
        .args(["load", "-i", path.to_str().unwrap()])
        .assert()
        .code(2)
        .stdout(contains("Could not decode"));
}

#[test]
fn workbook_profiles_like_csv() {
    let workspace = TestWorkspace::new();
    let path = workspace.write_xlsx(
        "trend.xlsx",
        &[
            &[Some("year"), Some("revenue")],
            &[Some("2021"), Some("200")],
            &[Some("2022"), Some("150")],
        ],
    );
    Command::cargo_bin("sheet-insights")
        .expect("binary exists")
        .args(["profile", "-i", path.to_str().unwrap(), "--format", "json"])
        .assert()
        .success()
        .stdout(contains("\"direction\": \"decreasing\""))
        .stdout(contains("\"changePercent\": -25.0"));
}
