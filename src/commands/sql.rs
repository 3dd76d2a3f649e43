use anyhow::Result;
use clap::Parser;
use log::debug;

use crate::playground::drizzle_to_sql;

#[derive(Parser, Debug)]
pub struct SqlCommand {
    /// Query-builder expression, e.g. "db.select().from(users).limit(5)"
    pub expression: String,
}

impl SqlCommand {
    pub fn run(&self) -> Result<()> {
        debug!("Translating {}", self.expression);
        let sql = drizzle_to_sql(&self.expression)?;
        println!("{sql}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_unsupported_expressions() {
        let cmd = SqlCommand {
            expression: "db.transaction(run)".to_string(),
        };
        let err = cmd.run().unwrap_err();
        assert_eq!(err.to_string(), "Unsupported builder method: .transaction()");
    }
}
