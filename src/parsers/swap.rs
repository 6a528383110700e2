use crate::error::Error;
use crate::events::{DomainEvent, SwapEvent};
use crate::parsers::{collect_transfer_legs, fee_payer};
use crate::protocols::Dex;
use crate::types::TransactionRecord;

/// Swap direction from the inner transfer sequence: the first leg is the
/// trader's payment into the pool, the last is the payout. Assumes a single
/// hop; routed swaps report the outer legs only.
pub fn parse_swap(record: &TransactionRecord, dex: Dex) -> Option<Result<DomainEvent, Error>> {
    let legs = match collect_transfer_legs(record) {
        Ok(legs) => legs,
        Err(e) => return Some(Err(e)),
    };

    let (Some(first), Some(last)) = (legs.first(), legs.last()) else {
        tracing::debug!(signature = %record.signature, "no transfer legs, not a swap");
        return None;
    };
    if legs.len() < 2 {
        tracing::debug!(signature = %record.signature, legs = legs.len(), "not enough transfer legs for a swap");
        return None;
    }

    Some(fee_payer(record).map(|trader_account| {
        DomainEvent::Swap(SwapEvent {
            dex,
            signature: record.signature.clone(),
            trader_account,
            token_in: first.destination.clone(),
            amount_in: first.amount.clone(),
            token_out: last.source.clone(),
            amount_out: last.amount.clone(),
            timestamp: record.block_time,
        })
    }))
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::testing::{RecordBuilder, leg, token_ix};

    fn swap(event: DomainEvent) -> SwapEvent {
        match event {
            DomainEvent::Swap(s) => s,
            other => unreachable!("expected swap, got {other:?}"),
        }
    }

    #[test]
    fn first_and_last_legs_define_direction() {
        let record = RecordBuilder::new("sig")
            .accounts(&["Trader", "UserA", "PoolA", "PoolB", "UserB"])
            .inner(
                0,
                vec![
                    leg("UserA", "PoolA", "1000000", None),
                    leg("PoolB", "UserB", "98765432109876543210", None),
                ],
            )
            .build();
        let event = swap(parse_swap(&record, Dex::Raydium).unwrap().unwrap());
        assert_eq!(event.dex, Dex::Raydium);
        assert_eq!(event.trader_account, "Trader");
        assert_eq!(event.token_in, "PoolA");
        assert_eq!(event.amount_in.to_string(), "1000000");
        assert_eq!(event.token_out, "PoolB");
        assert_eq!(event.amount_out.to_string(), "98765432109876543210");
        assert_eq!(event.timestamp, Some(1_700_000_000));
    }

    #[test]
    fn middle_legs_are_ignored() {
        let record = RecordBuilder::new("sig")
            .inner(0, vec![leg("A", "B", "1", None), leg("C", "D", "2", None)])
            .inner(1, vec![leg("E", "F", "3", None)])
            .build();
        let event = swap(parse_swap(&record, Dex::Raydium).unwrap().unwrap());
        assert_eq!(event.token_in, "B");
        assert_eq!(event.token_out, "E");
        assert_eq!(event.amount_out.to_string(), "3");
    }

    #[test]
    fn fewer_than_two_legs_is_not_a_swap() {
        let none = RecordBuilder::new("sig").build();
        assert!(parse_swap(&none, Dex::Raydium).is_none());

        let one = RecordBuilder::new("sig")
            .inner(0, vec![leg("A", "B", "1", None)])
            .inner(1, vec![token_ix("closeAccount", serde_json::json!({}))])
            .build();
        assert!(parse_swap(&one, Dex::Raydium).is_none());
    }

    #[test]
    fn malformed_leg_is_reported() {
        let record = RecordBuilder::new("sig")
            .inner(
                0,
                vec![
                    leg("A", "B", "1", None),
                    token_ix("transfer", serde_json::json!({"source": "C", "amount": "2"})),
                ],
            )
            .build();
        assert!(parse_swap(&record, Dex::Raydium).unwrap().is_err());
    }
}
