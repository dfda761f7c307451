use crate::domain::form::PaymentRequest;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct PaymentRecord<'a> {
    amount: Decimal,
    payee_account: &'a str,
    purpose: &'a str,
    payer_account: &'a str,
    payee: &'a str,
}

/// Writes accepted payments as CSV.
pub struct PaymentWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> PaymentWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_payments(&mut self, payments: &[PaymentRequest]) -> Result<()> {
        if payments.is_empty() {
            self.writer
                .write_record(["amount", "payee_account", "purpose", "payer_account", "payee"])?;
        }
        for payment in payments {
            self.writer.serialize(PaymentRecord {
                amount: payment.amount,
                payee_account: &payment.payee_account,
                purpose: &payment.purpose,
                payer_account: payment.payer_account.as_str(),
                payee: &payment.payee,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
