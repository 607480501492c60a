pub mod json;
pub mod table;

use crate::record::Record;

/// Print a stored listing for `driverwatch show`.
pub fn print<R: Record>(records: Option<&[R]>, json_output: bool) {
    let Some(records) = records else {
        println!(
            "No {} snapshot stored yet. Run 'driverwatch check' to create one.",
            R::KIND.noun()
        );
        return;
    };

    if json_output {
        println!("{}", json::render(records));
    } else {
        print!("{}", table::render(records));
    }
}
