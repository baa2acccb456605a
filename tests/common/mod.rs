use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const MEMBERS: [&str; 4] = ["alice", "bob", "charlie", "diana"];

fn write_row(wtr: &mut csv::Writer<File>, id: usize) -> Result<(), Error> {
    let payer = MEMBERS[id % MEMBERS.len()];
    let with = MEMBERS[..=(id % MEMBERS.len())].join(";");
    let id = id.to_string();
    wtr.write_record([id.as_str(), "Groceries", payer, "12.34", with.as_str()])?;
    Ok(())
}

pub fn generate_csv(path: &Path, rows: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["id", "description", "payer", "amount", "participants"])?;

    for i in 1..=rows {
        write_row(&mut wtr, i)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn generate_large_csv(path: &Path, size_mb: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);
    wtr.write_record(["id", "description", "payer", "amount", "participants"])?;

    let target_size = (size_mb * 1024 * 1024) as u64;
    let mut id = 1;

    // Check size every 5000 rows to avoid syscall overhead
    loop {
        for _ in 0..5000 {
            write_row(&mut wtr, id)?;
            id += 1;
        }
        wtr.flush()?;
        if std::fs::metadata(path)?.len() >= target_size {
            break;
        }
    }
    Ok(())
}
