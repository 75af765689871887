use crate::types::{Withdrawal, WithdrawalHash};
use alloy_primitives::keccak256;
use alloy_sol_types::SolValue;
use binding::opstack::WithdrawalTransaction;

pub fn compute_withdrawal_hash(tx: &WithdrawalTransaction) -> WithdrawalHash {
    // Solidity's Hashing.hashWithdrawal uses:
    // keccak256(abi.encode(_tx.nonce, _tx.sender, _tx.target, _tx.value, _tx.gasLimit, _tx.data))
    // abi_encode_sequence encodes the fields directly without a wrapper offset
    let encoded = (
        &tx.nonce,
        &tx.sender,
        &tx.target,
        &tx.value,
        &tx.gasLimit,
        &tx.data,
    )
        .abi_encode_sequence();

    keccak256(encoded)
}

/// Hash of the six message fields, ignoring the recorded `withdrawal_hash`.
pub fn hash_withdrawal(withdrawal: &Withdrawal) -> WithdrawalHash {
    compute_withdrawal_hash(&withdrawal.transaction())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{hex, Address, Bytes, B256, U256};

    fn base_withdrawal() -> Withdrawal {
        Withdrawal {
            nonce: U256::from(1),
            sender: Address::from([0x01; 20]),
            target: Address::from([0x02; 20]),
            value: U256::from(1_000_000),
            gas_limit: U256::from(100_000),
            data: Bytes::from(vec![0xaa, 0xbb, 0xcc]),
            withdrawal_hash: B256::ZERO,
        }
    }

    #[test]
    fn test_hash_withdrawal_deterministic() {
        let withdrawal = base_withdrawal();

        let hash1 = hash_withdrawal(&withdrawal);
        let hash2 = hash_withdrawal(&withdrawal.clone());

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, B256::ZERO);
    }

    #[test]
    fn test_hash_ignores_recorded_hash() {
        let mut withdrawal = base_withdrawal();
        let before = hash_withdrawal(&withdrawal);
        withdrawal.withdrawal_hash = B256::repeat_byte(0x42);
        assert_eq!(hash_withdrawal(&withdrawal), before);
    }

    #[test]
    fn test_hash_changes_with_every_field() {
        let base = base_withdrawal();
        let base_hash = hash_withdrawal(&base);

        let variants = [
            Withdrawal {
                nonce: U256::from(2),
                ..base.clone()
            },
            Withdrawal {
                sender: Address::from([0x03; 20]),
                ..base.clone()
            },
            Withdrawal {
                target: Address::from([0x04; 20]),
                ..base.clone()
            },
            Withdrawal {
                value: U256::from(1_000_001),
                ..base.clone()
            },
            Withdrawal {
                gas_limit: U256::from(100_001),
                ..base.clone()
            },
            Withdrawal {
                data: Bytes::from(vec![0xaa, 0xbb]),
                ..base.clone()
            },
        ];

        for variant in &variants {
            assert_ne!(hash_withdrawal(variant), base_hash, "{variant:?}");
        }
    }

    #[test]
    fn test_compute_withdrawal_hash_known_value() {
        // Withdrawal from Unichain Mainnet
        // TX: 0x91b374b5403401198a892f62db8843b60125cfb3e28ec1664089d9158424dc4a
        let withdrawal = Withdrawal {
            nonce: U256::from_be_bytes(hex!(
                "0001000000000000000000000000000000000000000000000000000000000818"
            )),
            sender: Address::from_slice(&hex!("000040D6c85A13a1AA74565FDe87e499dC023C6f")),
            target: Address::from_slice(&hex!("B03eEF386A61b5b462051636001485FFfdD3d843")),
            value: U256::ZERO,
            gas_limit: U256::from(200_000),
            data: Bytes::from(hex!(
                "095ea7b3"
                "000000000000000000000000000040d6c85a13a1aa74565fde87e499dc023c6f"
                "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
            )),
            withdrawal_hash: B256::ZERO,
        };

        // Hash from the MessagePassed event on chain
        let expected = B256::from_slice(&hex!(
            "49c43b60ec99e99046b54aec4c90419ff194300e567de63423c3b974ae46bd28"
        ));

        assert_eq!(hash_withdrawal(&withdrawal), expected);
        assert_eq!(compute_withdrawal_hash(&withdrawal.transaction()), expected);
    }
}
