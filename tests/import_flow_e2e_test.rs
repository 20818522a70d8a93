// ==========================================
// Import flow end-to-end tests
// ==========================================
// upload -> preview -> confirm against a real SQLite file
// ==========================================

mod helpers;

use helpers::mock_config::MockPolicy;
use helpers::mock_store::MockMaterialStore;
use scorte::api::{ApiError, ImportApi};
use scorte::app::AppState;
use scorte::domain::{ContactChannel, StockStatus};
use scorte::importer::{ImportSession, ImportStep};
use scorte::logging;
use std::sync::Arc;
use tempfile::TempDir;

const WAREHOUSE_CSV: &str = "Descrizione,Quantità,Unità,Consumo,Giorni_consegna,Costo,Fornitore,Email\n\
Cemento,5,sacchi,2,4,10,Edilcentro,ordini@edilcentro.it\n\
Sabbia,12,kg,2,4,1,,\n\
Vernice,,litri,1,2,8,,\n\
Ghiaia,100,kg,1,2,,,\n";

fn setup_state() -> (tempfile::NamedTempFile, AppState) {
    logging::init_test();
    let (temp_file, db_path) = test_helpers::create_test_db().expect("Failed to create test db");
    let state = AppState::new(db_path).expect("Failed to build state");
    (temp_file, state)
}

fn import_message(err: ApiError) -> String {
    match err {
        ApiError::ImportError { message, .. } => message,
        other => panic!("expected an import error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_csv_preview_then_confirm() {
    let (_temp_file, state) = setup_state();
    let mut session = ImportSession::new();

    let preview = state
        .import_api
        .upload_bytes(&mut session, "magazzino.csv", WAREHOUSE_CSV.as_bytes())
        .await
        .expect("upload failed");

    assert_eq!(session.step(), ImportStep::Preview);
    assert_eq!(preview.file_name, "magazzino.csv");
    assert_eq!(preview.valid_count, 3);
    assert_eq!(preview.error_count, 1);
    assert_eq!(preview.errors[0].row, 4);
    assert_eq!(preview.errors[0].message, "Quantità non valida");

    let report = state
        .import_api
        .confirm_import(&mut session)
        .await
        .expect("confirm failed");

    assert_eq!(report.total, 3);
    assert_eq!(report.succeeded, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(report.progress, 100);
    assert!(report.refresh_needed());
    assert_eq!(session.step(), ImportStep::Upload);
    assert!(session.valid_rows().is_empty());

    let views = state.material_api.list_materials().await.expect("list failed");
    let names: Vec<&str> = views.iter().map(|v| v.material.name.as_str()).collect();
    assert_eq!(names, vec!["Cemento", "Sabbia", "Ghiaia"]);

    // Cemento: 5 / 2 = 2.5 days left, lead 4
    assert_eq!(views[0].status, StockStatus::OrderNow);
    assert_eq!(views[0].remaining_days, Some(2.5));
    assert_eq!(views[0].recommended_order_quantity, Some(9));
    assert_eq!(views[0].impact_estimate, Some(80.0));
    assert_eq!(views[0].material.unit, "sacchi");

    // Sabbia: 6 days left, inside lead + 3
    assert_eq!(views[1].status, StockStatus::Attention);
    assert_eq!(views[1].recommended_order_quantity, Some(2));
    assert_eq!(views[1].material.supplier, None);

    assert_eq!(views[2].status, StockStatus::Ok);
    assert_eq!(views[2].recommended_order_quantity, None);
    assert_eq!(views[2].material.unit_cost, 0.0);

    let overview = state.material_api.get_overview().await.expect("overview failed");
    assert_eq!(overview.total, 3);
    assert_eq!(overview.order_now_count, 1);
    assert_eq!(overview.attention_count, 1);
    assert_eq!(overview.ok_count, 1);
    assert_eq!(overview.critical.len(), 1);
    assert_eq!(
        overview.critical[0].contact,
        Some(ContactChannel::Email("ordini@edilcentro.it".to_string()))
    );
    assert_eq!(overview.total_impact, 80.0);
}

#[tokio::test]
async fn test_vernice_without_quantity_blocks_confirm() {
    let (_temp_file, state) = setup_state();
    let mut session = ImportSession::new();

    let preview = state
        .import_api
        .upload_bytes(&mut session, "vernici.csv", b"Descrizione,Qty,Unit\xc3\xa0\nVernice,,litri\n")
        .await
        .expect("upload failed");

    assert_eq!(preview.valid_count, 0);
    assert_eq!(preview.errors.len(), 1);
    assert_eq!(preview.errors[0].row, 2);
    assert_eq!(preview.errors[0].message, "Quantità non valida");

    let err = state
        .import_api
        .confirm_import(&mut session)
        .await
        .unwrap_err();
    assert_eq!(import_message(err), "Nessun dato valido da importare");
    assert_eq!(session.step(), ImportStep::Preview);

    state.import_api.cancel(&mut session).expect("cancel failed");
    assert_eq!(session.step(), ImportStep::Upload);
    assert!(state.material_api.list_materials().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fatal_errors_reset_session() {
    let (_temp_file, state) = setup_state();
    let mut session = ImportSession::new();

    state
        .import_api
        .upload_bytes(&mut session, "ok.csv", b"nome,quantita\nChiodi,40\n")
        .await
        .expect("upload failed");
    assert_eq!(session.step(), ImportStep::Preview);

    let err = state
        .import_api
        .upload_bytes(&mut session, "vuoto.csv", b"nome,quantita\n")
        .await
        .unwrap_err();
    assert_eq!(import_message(err), "Il file è vuoto o non ha dati validi.");
    assert_eq!(session.step(), ImportStep::Upload);
    assert!(session.valid_rows().is_empty());

    let err = state
        .import_api
        .upload_bytes(&mut session, "codici.csv", b"codice,quantita\nA1,5\n")
        .await
        .unwrap_err();
    assert_eq!(
        import_message(err),
        "Colonna \"Nome\" non trovata. Puoi usare anche: Descrizione, Materiale o Prodotto."
    );
    assert_eq!(session.step(), ImportStep::Upload);
}

#[tokio::test]
async fn test_boundary_rejections() {
    logging::init_test();
    let store = Arc::new(MockMaterialStore::new());
    let policy = Arc::new(MockPolicy::new().with_max_upload_bytes(1024 * 1024));
    let api = ImportApi::new(store.clone(), policy);
    let mut session = ImportSession::new();

    let err = api
        .upload_bytes(&mut session, "scorte.pdf", b"nome,quantita\nA,1\n")
        .await
        .unwrap_err();
    assert_eq!(
        import_message(err),
        "Formato file non supportato. Usa .xlsx, .xls o .csv"
    );

    let oversized = vec![b'a'; 1024 * 1024 + 1];
    let err = api
        .upload_bytes(&mut session, "grande.csv", &oversized)
        .await
        .unwrap_err();
    assert_eq!(import_message(err), "File troppo grande. Massimo 1MB.");

    assert_eq!(session.step(), ImportStep::Upload);
    assert!(store.create_calls().is_empty());
}

#[tokio::test]
async fn test_upload_file_semicolon_csv() {
    let (_temp_file, state) = setup_state();
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = test_helpers::write_import_file(
        &dir,
        "listino.csv",
        "Materiale;Quantità;Unità;Consumo medio;Prezzo\nFarina;12,5;;0,5;1,20\n".as_bytes(),
    )
    .expect("Failed to write file");

    let mut session = ImportSession::new();
    let preview = state
        .import_api
        .upload_file(&mut session, &path)
        .await
        .expect("upload failed");

    assert_eq!(preview.file_name, "listino.csv");
    assert_eq!(preview.valid_count, 1);
    let row = &preview.valid_rows[0];
    assert_eq!(row.name, "Farina");
    assert_eq!(row.available_quantity, 12.5);
    assert_eq!(row.unit, "pz");
    assert_eq!(row.average_daily_consumption, Some(0.5));
    assert_eq!(row.unit_cost, Some(1.2));
}

#[tokio::test]
async fn test_xlsx_import() {
    use rust_xlsxwriter::Workbook;

    let (_temp_file, state) = setup_state();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = ["Prodotto", "Qty", "UM", "Consumo", "Consegna", "Fornitore", "Telefono"];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    sheet.write_string(1, 0, "Guanti").unwrap();
    sheet.write_number(1, 1, 3.0).unwrap();
    sheet.write_string(1, 2, "paia").unwrap();
    sheet.write_number(1, 3, 1.0).unwrap();
    sheet.write_number(1, 4, 5.0).unwrap();
    sheet.write_string(1, 5, "Sicurlavoro").unwrap();
    sheet.write_string(1, 6, "+39 02 5555").unwrap();
    sheet.write_string(2, 0, "Caschi").unwrap();
    sheet.write_number(2, 1, 30.0).unwrap();
    let payload = workbook.save_to_buffer().unwrap();

    let mut session = ImportSession::new();
    let preview = state
        .import_api
        .upload_bytes(&mut session, "dpi.xlsx", &payload)
        .await
        .expect("upload failed");
    assert_eq!(preview.valid_count, 2);
    assert_eq!(preview.error_count, 0);

    let report = state.import_api.confirm_import(&mut session).await.unwrap();
    assert_eq!(report.succeeded, 2);

    let overview = state.material_api.get_overview().await.unwrap();
    assert_eq!(overview.order_now_count, 1);
    let guanti = &overview.critical[0];
    assert_eq!(guanti.material.name, "Guanti");
    assert_eq!(guanti.material.unit, "paia");
    assert_eq!(
        guanti.contact,
        Some(ContactChannel::Phone("+39 02 5555".to_string()))
    );
}

#[tokio::test]
async fn test_new_upload_replaces_preview() {
    let (_temp_file, state) = setup_state();
    let mut session = ImportSession::new();

    state
        .import_api
        .upload_bytes(&mut session, "primo.csv", test_helpers::csv_with_rows(5).as_bytes())
        .await
        .unwrap();
    let preview = state
        .import_api
        .upload_bytes(&mut session, "secondo.csv", test_helpers::csv_with_rows(2).as_bytes())
        .await
        .unwrap();

    assert_eq!(preview.file_name, "secondo.csv");
    assert_eq!(session.file_name(), Some("secondo.csv"));
    assert_eq!(session.valid_rows().len(), 2);

    let report = state.import_api.confirm_import(&mut session).await.unwrap();
    assert_eq!(report.succeeded, 2);
    assert_eq!(state.material_api.list_materials().await.unwrap().len(), 2);
}
