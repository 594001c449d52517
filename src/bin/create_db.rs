fn main() {
    dotenvy::dotenv().ok();

    let records_db_sql = "CREATE TABLE blogdata (id INTEGER PRIMARY KEY, firstname VARCHAR(50), lastname VARCHAR(50), thedata TEXT);";

    let db_path = std::env::var("RECORDS_DB_PATH").unwrap_or_else(|_| "records.db".to_string());
    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .expect("Failed to create parent directory for records DB");
            println!(
                "Created parent directory for records DB at {}",
                parent.display()
            );
        }
    }

    if std::path::Path::new(&db_path).exists() {
        std::fs::remove_file(&db_path).expect("Failed to remove existing records DB");
        println!("Removed existing records DB at {}", db_path);
    }

    let conn = rusqlite::Connection::open(&db_path).expect("Failed to open database");
    conn.execute_batch(records_db_sql)
        .expect("Failed to create blogdata table");

    println!("Created new records DB at {}", db_path);

    create_record(
        &conn,
        "John",
        "Smith",
        "I spend most evenings writing about restoring old synthesizers, and I post build logs whenever a repair finally works.",
    );
}

fn create_record(conn: &rusqlite::Connection, first_name: &str, last_name: &str, text: &str) {
    conn.execute(
        "INSERT INTO blogdata (firstname, lastname, thedata) VALUES (?1, ?2, ?3)",
        [first_name, last_name, text],
    )
    .expect("Failed to insert record");
    println!("Created record for {} {}", first_name, last_name);
}
