fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 4 {
        eprintln!("Usage: add_record <firstname> <lastname> <textfile>");
        std::process::exit(1);
    }

    let db_path = std::env::var("RECORDS_DB_PATH").unwrap_or_else(|_| "records.db".to_string());
    let text = std::fs::read_to_string(&args[3]).expect("Failed to read text file");

    let conn = rusqlite::Connection::open(db_path).expect("Failed to open database");
    conn.execute(
        "INSERT INTO blogdata (firstname, lastname, thedata) VALUES (?1, ?2, ?3)",
        [args[1].as_str(), args[2].as_str(), text.trim()],
    )
    .expect("Failed to insert record");

    println!("Created record for {} {}", args[1], args[2]);
}
