use crate::error::Error;
use crate::events::{DomainEvent, LiquidityOperation};
use crate::parsers::liquidity::{LiquidityInstruction, parse_liquidity};
use crate::parsers::swap::parse_swap;
use crate::protocols::{Dex, DexAdapter};
use crate::types::TransactionRecord;

/// AMM v4 `deposit` instruction tag.
pub const ADD_LIQUIDITY_DISCRIMINATOR: u8 = 3;
/// AMM v4 `withdraw` instruction tag.
pub const REMOVE_LIQUIDITY_DISCRIMINATOR: u8 = 4;

/// Position of the AMM id in the deposit/withdraw account list.
const POOL_ACCOUNT_INDEX: usize = 1;

/// Scan top-level opaque instructions addressed to `program_id` for a
/// deposit/withdraw tag. First hit wins.
pub fn detect_liquidity_operation<'a>(
    record: &'a TransactionRecord,
    program_id: &str,
) -> Option<LiquidityInstruction<'a>> {
    record
        .instructions
        .iter()
        .filter_map(|ix| ix.as_opaque())
        .filter(|ix| ix.program_id == program_id)
        .find_map(|ix| {
            let operation = match ix.discriminator()? {
                ADD_LIQUIDITY_DISCRIMINATOR => LiquidityOperation::Add,
                REMOVE_LIQUIDITY_DISCRIMINATOR => LiquidityOperation::Remove,
                _ => return None,
            };
            Some(LiquidityInstruction {
                operation,
                pool_address: ix.accounts.get(POOL_ACCOUNT_INDEX).map(String::as_str),
            })
        })
}

pub struct RaydiumAdapter;

impl DexAdapter for RaydiumAdapter {
    fn dex(&self) -> Dex {
        Dex::Raydium
    }

    /// Liquidity detection runs first; a detected deposit/withdraw is never
    /// reinterpreted as a swap.
    fn parse(&self, record: &TransactionRecord) -> Option<Result<DomainEvent, Error>> {
        match detect_liquidity_operation(record, self.dex().program_id()) {
            Some(found) => parse_liquidity(record, self.dex(), found),
            None => parse_swap(record, self.dex()),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::protocols::RAYDIUM_AMM_PROGRAM_ID;
    use crate::testing::{RecordBuilder, leg, opaque, opaque_with_accounts};

    const COMPUTE_BUDGET: &str = "ComputeBudget111111111111111111111111111111";

    #[test]
    fn detects_deposit_and_withdraw_tags() {
        let add = RecordBuilder::new("sig")
            .instruction(opaque_with_accounts(
                RAYDIUM_AMM_PROGRAM_ID,
                &["TokenProgram", "AmmId", "Authority"],
                &[3, 0, 1],
            ))
            .build();
        let found = detect_liquidity_operation(&add, RAYDIUM_AMM_PROGRAM_ID).unwrap();
        assert_eq!(found.operation, LiquidityOperation::Add);
        assert_eq!(found.pool_address, Some("AmmId"));

        let remove = RecordBuilder::new("sig")
            .instruction(opaque(RAYDIUM_AMM_PROGRAM_ID, &[4]))
            .build();
        let found = detect_liquidity_operation(&remove, RAYDIUM_AMM_PROGRAM_ID).unwrap();
        assert_eq!(found.operation, LiquidityOperation::Remove);
        assert_eq!(found.pool_address, None);
    }

    #[test]
    fn ignores_tags_on_other_programs() {
        let record = RecordBuilder::new("sig")
            .instruction(opaque(COMPUTE_BUDGET, &[3, 0x40, 0x0d, 0x03, 0]))
            .instruction(opaque(RAYDIUM_AMM_PROGRAM_ID, &[9]))
            .build();
        assert!(detect_liquidity_operation(&record, RAYDIUM_AMM_PROGRAM_ID).is_none());
    }

    #[test]
    fn swap_instruction_routes_to_swap_parser() {
        let record = RecordBuilder::new("sig")
            .instruction(opaque(RAYDIUM_AMM_PROGRAM_ID, &[9]))
            .inner(0, vec![leg("UserA", "VaultA", "10", None), leg("VaultB", "UserB", "20", None)])
            .build();
        let event = RaydiumAdapter.parse(&record).unwrap().unwrap();
        assert_eq!(event.kind(), "swap");
    }

    #[test]
    fn undecodable_withdraw_does_not_fall_back_to_swap() {
        let record = RecordBuilder::new("sig")
            .instruction(opaque(RAYDIUM_AMM_PROGRAM_ID, &[4]))
            .inner(0, vec![leg("VaultA", "U1", "10", None), leg("VaultB", "U2", "20", None)])
            .build();
        assert!(RaydiumAdapter.parse(&record).is_none());
    }
}
