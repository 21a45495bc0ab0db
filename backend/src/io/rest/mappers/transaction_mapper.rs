use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::domain::commands::transactions::TransactionCommand;
use crate::domain::models::{Transaction as DomainTransaction, TransactionType as DomainTransactionType};
use crate::domain::month_window::check_year;
use crate::domain::DomainError;
use shared::{
    Transaction as SharedTransaction, TransactionRequest, TransactionType as SharedTransactionType,
};

pub struct TransactionMapper;

impl TransactionMapper {
    /// Check a create/replace body and build the domain command
    pub fn to_command(request: TransactionRequest) -> Result<TransactionCommand, DomainError> {
        let amount = request
            .amount
            .ok_or_else(|| DomainError::validation("Amount is required"))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(DomainError::validation("Amount must be a positive number"));
        }

        let description = request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .ok_or_else(|| DomainError::validation("Description is required"))?;

        let date = request
            .date
            .as_deref()
            .ok_or_else(|| DomainError::validation("Date is required"))
            .and_then(Self::parse_date)?;

        let transaction_type = request
            .transaction_type
            .ok_or_else(|| DomainError::validation("Transaction type is required"))?;

        Ok(TransactionCommand {
            amount,
            date,
            description,
            category: request.category.filter(|c| !c.trim().is_empty()),
            transaction_type: Self::to_domain_type(transaction_type),
        })
    }

    /// RFC 3339 timestamps in any offset, or a bare date meaning midnight UTC.
    ///
    /// The UTC year must be in 1..=9999 so the stored text reads back.
    pub fn parse_date(value: &str) -> Result<DateTime<Utc>, DomainError> {
        let value = value.trim();
        let date = match DateTime::parse_from_rfc3339(value) {
            Ok(timestamp) => timestamp.with_timezone(&Utc),
            Err(_) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|midnight| midnight.and_utc())
                .ok_or_else(|| DomainError::validation(format!("Invalid date: {}", value)))?,
        };

        check_year(date.year())?;
        Ok(date)
    }

    pub fn to_dto(domain: DomainTransaction) -> SharedTransaction {
        SharedTransaction {
            id: domain.id,
            amount: domain.amount,
            date: domain.date,
            description: domain.description,
            category: domain.category,
            transaction_type: Self::to_dto_type(domain.transaction_type),
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    fn to_domain_type(dto_type: SharedTransactionType) -> DomainTransactionType {
        match dto_type {
            SharedTransactionType::Income => DomainTransactionType::Income,
            SharedTransactionType::Expense => DomainTransactionType::Expense,
        }
    }

    fn to_dto_type(domain_type: DomainTransactionType) -> SharedTransactionType {
        match domain_type {
            DomainTransactionType::Income => SharedTransactionType::Income,
            DomainTransactionType::Expense => SharedTransactionType::Expense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn request() -> TransactionRequest {
        TransactionRequest {
            amount: Some(12.5),
            date: Some("2024-03-02".to_string()),
            description: Some("  Lunch ".to_string()),
            category: Some("food".to_string()),
            transaction_type: Some(SharedTransactionType::Expense),
        }
    }

    #[test]
    fn test_valid_request_becomes_command() {
        let command = TransactionMapper::to_command(request()).unwrap();

        assert_eq!(command.amount, 12.5);
        assert_eq!(command.description, "Lunch");
        assert_eq!(command.date, Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap());
        assert_eq!(command.transaction_type, DomainTransactionType::Expense);
    }

    #[test]
    fn test_rfc3339_dates_are_normalized_to_utc() {
        let parsed = TransactionMapper::parse_date("2024-03-31T22:30:00-04:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 4, 1, 2, 30, 0).unwrap());
    }

    #[test]
    fn test_missing_or_invalid_fields_are_rejected() {
        let cases = [
            TransactionRequest { amount: None, ..request() },
            TransactionRequest { amount: Some(0.0), ..request() },
            TransactionRequest { amount: Some(-3.0), ..request() },
            TransactionRequest { description: Some("   ".to_string()), ..request() },
            TransactionRequest { date: None, ..request() },
            TransactionRequest { date: Some("yesterday".to_string()), ..request() },
            TransactionRequest { transaction_type: None, ..request() },
        ];

        for case in cases {
            assert!(
                matches!(TransactionMapper::to_command(case.clone()), Err(DomainError::Validation(_))),
                "accepted {:?}",
                case
            );
        }
    }

    #[test]
    fn test_dates_outside_four_digit_years_are_rejected() {
        for value in [
            "-0001-01-01",
            "0000-06-15",
            "+10000-01-01",
            "0001-01-01T00:30:00+01:00",
            "9999-12-31T23:00:00-05:00",
        ] {
            assert!(
                matches!(TransactionMapper::parse_date(value), Err(DomainError::Validation(_))),
                "accepted {}",
                value
            );
        }

        assert!(TransactionMapper::parse_date("0001-01-01").is_ok());
        assert!(TransactionMapper::parse_date("9999-12-31T23:59:59Z").is_ok());
    }

    #[test]
    fn test_blank_category_means_uncategorized() {
        let command = TransactionMapper::to_command(TransactionRequest {
            category: Some(String::new()),
            ..request()
        })
        .unwrap();

        assert_eq!(command.category, None);
    }
}
