use crate::error::Error;
use crate::events::{DomainEvent, LiquidityEvent, LiquidityOperation, TokenLeg};
use crate::parsers::{TransferLeg, collect_transfer_and_burn_legs, collect_transfer_legs, fee_payer};
use crate::protocols::Dex;
use crate::types::TransactionRecord;

/// Pool deposit or withdrawal located by a protocol's discriminator check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidityInstruction<'a> {
    pub operation: LiquidityOperation,
    pub pool_address: Option<&'a str>,
}

pub fn parse_liquidity(
    record: &TransactionRecord,
    dex: Dex,
    found: LiquidityInstruction<'_>,
) -> Option<Result<DomainEvent, Error>> {
    let result = match found.operation {
        LiquidityOperation::Add => collect_transfer_legs(record).map(|legs| add_legs(record, legs)),
        LiquidityOperation::Remove => {
            collect_transfer_and_burn_legs(record).map(|legs| remove_legs(record, legs))
        }
    };

    let (token_a, token_b, lp_token) = match result {
        Ok(Some(legs)) => legs,
        Ok(None) => {
            tracing::debug!(
                signature = %record.signature,
                operation = %found.operation,
                "transfer legs do not describe a liquidity operation"
            );
            return None;
        }
        Err(e) => return Some(Err(e)),
    };

    Some(fee_payer(record).map(|trader_account| {
        DomainEvent::Liquidity(LiquidityEvent {
            dex,
            signature: record.signature.clone(),
            operation: found.operation,
            trader_account,
            token_a,
            token_b,
            lp_token,
            pool_address: found.pool_address.map(str::to_string),
            timestamp: record.block_time,
        })
    }))
}

type ResolvedLegs = (TokenLeg, TokenLeg, Option<TokenLeg>);

/// The two largest legs by magnitude are the deposited tokens; the next
/// positive leg of a third mint is the minted LP receipt.
fn add_legs(record: &TransactionRecord, legs: Vec<TransferLeg>) -> Option<ResolvedLegs> {
    if legs.len() < 2 {
        return None;
    }
    let mut legs: Vec<TokenLeg> = legs.into_iter().map(|l| resolve_mint(record, l)).collect();
    legs.sort_by(|a, b| b.amount.cmp_magnitude(&a.amount));

    let mut iter = legs.into_iter();
    let token_a = iter.next()?;
    let token_b = iter.next()?;
    let lp_token =
        iter.find(|l| l.amount.is_positive() && l.mint != token_a.mint && l.mint != token_b.mint);
    Some((token_a, token_b, lp_token))
}

/// The first negative leg is the burned LP token; the two largest positive
/// legs are the tokens paid out of the pool.
fn remove_legs(record: &TransactionRecord, legs: Vec<TransferLeg>) -> Option<ResolvedLegs> {
    let legs: Vec<TokenLeg> = legs.into_iter().map(|l| resolve_mint(record, l)).collect();
    let lp_token = legs.iter().find(|l| l.amount.is_negative())?.clone();

    let mut positive: Vec<TokenLeg> = legs.into_iter().filter(|l| l.amount.is_positive()).collect();
    if positive.len() < 2 {
        return None;
    }
    positive.sort_by(|a, b| b.amount.cmp(&a.amount));

    let mut iter = positive.into_iter();
    let token_a = iter.next()?;
    let token_b = iter.next()?;
    Some((token_a, token_b, Some(lp_token)))
}

/// Explicit mint first, then the post-balance entry of the destination, then
/// of the source. Empty when none of them is known.
fn resolve_mint(record: &TransactionRecord, leg: TransferLeg) -> TokenLeg {
    let mint = leg
        .mint
        .or_else(|| record.post_balance_mint(&leg.destination).map(str::to_string))
        .or_else(|| record.post_balance_mint(&leg.source).map(str::to_string))
        .unwrap_or_default();
    TokenLeg {
        mint,
        amount: leg.amount,
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::testing::{RecordBuilder, leg, token_ix};

    const ADD: LiquidityInstruction<'static> = LiquidityInstruction {
        operation: LiquidityOperation::Add,
        pool_address: Some("Pool"),
    };
    const REMOVE: LiquidityInstruction<'static> = LiquidityInstruction {
        operation: LiquidityOperation::Remove,
        pool_address: None,
    };

    fn liquidity(event: DomainEvent) -> LiquidityEvent {
        match event {
            DomainEvent::Liquidity(l) => l,
            other => unreachable!("expected liquidity, got {other:?}"),
        }
    }

    #[test]
    fn add_picks_two_largest_and_lp_receipt() {
        let record = RecordBuilder::new("sig")
            .inner(
                0,
                vec![
                    leg("U1", "V1", "300", Some("MintB")),
                    leg("Mint", "U3", "50", Some("MintLP")),
                    leg("U2", "V2", "500", Some("MintA")),
                ],
            )
            .build();
        let event = liquidity(parse_liquidity(&record, Dex::Raydium, ADD).unwrap().unwrap());
        assert_eq!(event.operation, LiquidityOperation::Add);
        assert_eq!(event.token_a.amount.to_string(), "500");
        assert_eq!(event.token_a.mint, "MintA");
        assert_eq!(event.token_b.amount.to_string(), "300");
        let lp = event.lp_token.unwrap();
        assert_eq!(lp.amount.to_string(), "50");
        assert_eq!(lp.mint, "MintLP");
        assert_eq!(event.pool_address.as_deref(), Some("Pool"));
        assert_eq!(event.trader_account, "Trader");
    }

    #[test]
    fn add_without_third_mint_has_no_lp_token() {
        let record = RecordBuilder::new("sig")
            .inner(
                0,
                vec![
                    leg("U1", "V1", "500", Some("MintA")),
                    leg("U2", "V2", "300", Some("MintB")),
                    leg("U3", "V3", "20", Some("MintA")),
                ],
            )
            .build();
        let event = liquidity(parse_liquidity(&record, Dex::Raydium, ADD).unwrap().unwrap());
        assert!(event.lp_token.is_none());
    }

    #[test]
    fn add_compares_magnitudes_beyond_u64() {
        let record = RecordBuilder::new("sig")
            .inner(
                0,
                vec![
                    leg("U1", "V1", "18446744073709551616", Some("MintA")),
                    leg("U2", "V2", "99999999999999999999", Some("MintB")),
                ],
            )
            .build();
        let event = liquidity(parse_liquidity(&record, Dex::Raydium, ADD).unwrap().unwrap());
        assert_eq!(event.token_a.amount.to_string(), "99999999999999999999");
        assert_eq!(event.token_b.amount.to_string(), "18446744073709551616");
    }

    #[test]
    fn add_recovers_mints_from_post_balances() {
        let record = RecordBuilder::new("sig")
            .accounts(&["Trader", "U1", "VaultA", "U2", "VaultB", "LpAta"])
            .inner(
                0,
                vec![
                    leg("U1", "VaultA", "500", None),
                    leg("U2", "VaultB", "300", None),
                    leg("LpMint", "LpAta", "40", None),
                ],
            )
            .post_balance(2, "MintA", "1500")
            .post_balance(4, "MintB", "900")
            .post_balance(5, "MintLP", "40")
            .build();
        let event = liquidity(parse_liquidity(&record, Dex::Raydium, ADD).unwrap().unwrap());
        assert_eq!(event.token_a.mint, "MintA");
        assert_eq!(event.token_b.mint, "MintB");
        assert_eq!(event.lp_token.unwrap().mint, "MintLP");
    }

    #[test]
    fn unresolved_mints_stay_empty() {
        let record = RecordBuilder::new("sig")
            .inner(
                0,
                vec![leg("U1", "V1", "500", None), leg("U2", "V2", "300", None)],
            )
            .build();
        let event = liquidity(parse_liquidity(&record, Dex::Raydium, ADD).unwrap().unwrap());
        assert_eq!(event.token_a.mint, "");
        assert_eq!(event.token_b.mint, "");
    }

    #[test]
    fn add_needs_two_legs() {
        let record = RecordBuilder::new("sig")
            .inner(0, vec![leg("U1", "V1", "500", Some("MintA"))])
            .build();
        assert!(parse_liquidity(&record, Dex::Raydium, ADD).is_none());
    }

    #[test]
    fn remove_uses_negative_leg_as_lp_token() {
        let record = RecordBuilder::new("sig")
            .inner(
                0,
                vec![
                    leg("LpAta", "Burn", "-700", Some("MintLP")),
                    leg("VaultB", "U2", "200", Some("MintB")),
                    leg("VaultA", "U1", "400", Some("MintA")),
                ],
            )
            .build();
        let event = liquidity(parse_liquidity(&record, Dex::Raydium, REMOVE).unwrap().unwrap());
        assert_eq!(event.operation, LiquidityOperation::Remove);
        assert_eq!(event.token_a.mint, "MintA");
        assert_eq!(event.token_a.amount.to_string(), "400");
        assert_eq!(event.token_b.amount.to_string(), "200");
        assert_eq!(event.lp_token.unwrap().amount.to_string(), "-700");
        assert!(event.pool_address.is_none());
    }

    #[test]
    fn remove_counts_inner_burn_as_lp_leg() {
        let record = RecordBuilder::new("sig")
            .inner(
                0,
                vec![
                    token_ix(
                        "burn",
                        serde_json::json!({"account": "LpAta", "mint": "MintLP", "authority": "Trader", "amount": "700"}),
                    ),
                    leg("VaultA", "U1", "400", Some("MintA")),
                    leg("VaultB", "U2", "200", Some("MintB")),
                ],
            )
            .build();
        let event = liquidity(parse_liquidity(&record, Dex::Raydium, REMOVE).unwrap().unwrap());
        let lp = event.lp_token.unwrap();
        assert_eq!(lp.mint, "MintLP");
        assert_eq!(lp.amount.to_string(), "-700");
    }

    #[test]
    fn remove_without_negative_leg_is_none() {
        let record = RecordBuilder::new("sig")
            .inner(
                0,
                vec![
                    leg("VaultA", "U1", "400", Some("MintA")),
                    leg("VaultB", "U2", "200", Some("MintB")),
                ],
            )
            .build();
        assert!(parse_liquidity(&record, Dex::Raydium, REMOVE).is_none());
    }

    #[test]
    fn remove_needs_two_positive_legs() {
        let record = RecordBuilder::new("sig")
            .inner(
                0,
                vec![
                    leg("LpAta", "Burn", "-700", Some("MintLP")),
                    leg("VaultA", "U1", "400", Some("MintA")),
                ],
            )
            .build();
        assert!(parse_liquidity(&record, Dex::Raydium, REMOVE).is_none());
    }
}
