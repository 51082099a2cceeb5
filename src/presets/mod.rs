//! Built-in column sets
//!
//! The invoice and opportunity listings of the management console, ready to
//! hand to the exporter or the CLI (`--preset invoices`).

use crate::export::column::ColumnSpec;
use crate::export::definition::{date_column, path_column};

/// A named column set with its default title and filename
#[derive(Debug, Clone)]
pub struct Preset {
    pub name: &'static str,
    pub title: &'static str,
    pub filename: &'static str,
    pub columns: Vec<ColumnSpec>,
}

/// Names accepted by [`preset`]
pub const PRESET_NAMES: &[&str] = &["invoices", "opportunities"];

/// Look up a built-in preset by name
pub fn preset(name: &str) -> Option<Preset> {
    match name {
        "invoices" | "factures" => Some(Preset {
            name: "invoices",
            title: "Liste des Factures",
            filename: "factures",
            columns: invoice_columns(),
        }),
        "opportunities" | "opportunites" => Some(Preset {
            name: "opportunities",
            title: "Opportunités Commerciales",
            filename: "opportunites",
            columns: opportunity_columns(),
        }),
        _ => None,
    }
}

/// Columns of the billing listing
pub fn invoice_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::field("Numéro", "invoice_number"),
        path_column("Client", "clients.name", ""),
        ColumnSpec::field("Montant (MAD)", "amount"),
        date_column("Date d'émission", "issue_date", ""),
        date_column("Date d'échéance", "due_date", ""),
        ColumnSpec::field("Statut", "status"),
    ]
}

/// Columns of the sales pipeline listing
pub fn opportunity_columns() -> Vec<ColumnSpec> {
    vec![
        ColumnSpec::field("Titre", "title"),
        path_column("Client", "clients.name", ""),
        ColumnSpec::field("Valeur (MAD)", "value"),
        path_column("Étape", "pipeline_stages.name", ""),
        ColumnSpec::field("Probabilité (%)", "probability"),
        date_column("Date clôture prévue", "expected_close_date", "-"),
        ColumnSpec::field("Statut", "status"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::project;
    use serde_json::json;

    #[test]
    fn test_invoice_projection() {
        let dataset = vec![json!({
            "id": "a1",
            "invoice_number": "FAC-2024-001",
            "amount": 1500,
            "status": "paid",
            "issue_date": "2024-03-05",
            "due_date": "2024-04-04T00:00:00Z",
            "clients": { "name": "Atlas SARL" },
        })];

        let matrix = project(&dataset, &invoice_columns()).unwrap();
        assert_eq!(
            matrix.headers(),
            [
                "Numéro",
                "Client",
                "Montant (MAD)",
                "Date d'émission",
                "Date d'échéance",
                "Statut"
            ]
        );
        let cells: Vec<String> = matrix.rows()[0].iter().map(ToString::to_string).collect();
        assert_eq!(
            cells,
            ["FAC-2024-001", "Atlas SARL", "1500", "05/03/2024", "04/04/2024", "paid"]
        );
    }

    #[test]
    fn test_invoice_without_client() {
        let dataset = vec![json!({ "invoice_number": "FAC-2", "amount": 10 })];
        let matrix = project(&dataset, &invoice_columns()).unwrap();
        let row = &matrix.rows()[0];
        assert!(row[1].is_empty());
        assert!(row[3].is_empty());
        assert!(row[5].is_empty());
    }

    #[test]
    fn test_opportunity_close_date_dash() {
        let dataset = vec![
            json!({
                "title": "Renouvellement",
                "value": 42000,
                "probability": 60,
                "status": "open",
                "clients": { "name": "Atlas SARL" },
                "pipeline_stages": { "name": "Négociation", "color": "#f00" },
                "expected_close_date": "2025-06-30",
            }),
            json!({ "title": "Nouveau", "value": 0, "probability": 10, "status": "open" }),
        ];

        let matrix = project(&dataset, &opportunity_columns()).unwrap();
        assert_eq!(matrix.column_count(), 7);
        assert_eq!(matrix.rows()[0][3].to_string(), "Négociation");
        assert_eq!(matrix.rows()[0][5].to_string(), "30/06/2025");
        assert_eq!(matrix.rows()[1][3].to_string(), "");
        assert_eq!(matrix.rows()[1][5].to_string(), "-");
    }

    #[test]
    fn test_preset_lookup() {
        let invoices = preset("invoices").unwrap();
        assert_eq!(invoices.title, "Liste des Factures");
        assert_eq!(invoices.filename, "factures");
        assert_eq!(invoices.columns.len(), 6);
        assert_eq!(preset("opportunites").unwrap().name, "opportunities");
        assert!(preset("tickets").is_none());
    }
}
