//! Mint composition: turn a mint descriptor into one unsigned transaction
//! that creates the account, initializes every extension and the base mint,
//! and writes post-initialization data.

use {
    crate::{
        catalog::{ordered_specs, BuildContext, Growth, Phase, PlannedInstruction},
        client::{ProgramClient, SendTransaction},
        error::{ProtocolError, TokenError, TokenResult},
        extension::{ExtensionKind, ExtensionSpec},
        layout::calculate_mint_len,
    },
    futures::future::try_join_all,
    solana_sdk::{
        hash::Hash, instruction::Instruction, message::Message, packet::PACKET_DATA_SIZE,
        pubkey::Pubkey, system_instruction, transaction::Transaction,
    },
    spl_token_2022::instruction::initialize_mint2,
    std::collections::BTreeSet,
};

/// The mint to create
#[derive(Clone, Debug, PartialEq)]
pub struct MintDescriptor {
    pub mint: Pubkey,
    pub decimals: u8,
    pub mint_authority: Pubkey,
    pub freeze_authority: Option<Pubkey>,
    /// Extensions in any order; the catalog decides emission order
    pub extensions: Vec<ExtensionSpec>,
}

/// An instruction of the composed transaction, tagged with the extension it
/// belongs to. Account creation and base initialization carry no kind.
#[derive(Clone, Debug, PartialEq)]
pub struct PlanInstruction {
    pub kind: Option<ExtensionKind>,
    pub instruction: Instruction,
}

/// Everything about a mint creation that can be known without the ledger
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPlan {
    mint: Pubkey,
    owner: Pubkey,
    account_len: usize,
    pre: Vec<PlannedInstruction>,
    initialize_mint: Instruction,
    post: Vec<PlannedInstruction>,
}

impl LayoutPlan {
    /// Validate the descriptor and plan its instructions
    pub fn new(token_program_id: &Pubkey, descriptor: &MintDescriptor) -> TokenResult<Self> {
        let account_len = calculate_mint_len(descriptor.decimals, &descriptor.extensions)?;
        let ctx = BuildContext {
            token_program_id,
            mint: &descriptor.mint,
            mint_authority: &descriptor.mint_authority,
        };
        let initialize_mint = initialize_mint2(
            token_program_id,
            &descriptor.mint,
            &descriptor.mint_authority,
            descriptor.freeze_authority.as_ref(),
            descriptor.decimals,
        )
        .map_err(ProtocolError::from)?;
        let mut pre = vec![];
        let mut post = vec![];
        for (phase, spec) in ordered_specs(&descriptor.extensions) {
            let planned = spec.build(&ctx).map_err(ProtocolError::from)?;
            match phase {
                Phase::Pre => pre.extend(planned),
                Phase::Post => post.extend(planned),
            }
        }
        Ok(Self {
            mint: descriptor.mint,
            owner: *token_program_id,
            account_len,
            pre,
            initialize_mint,
            post,
        })
    }

    /// Bytes allocated by the account creation
    pub fn account_len(&self) -> usize {
        self.account_len
    }

    /// Account lengths whose rent-exempt balance the plan needs: the length
    /// funded at creation, then the length covered after each incremental
    /// growth, in instruction order
    pub fn rent_lengths(&self) -> Vec<usize> {
        let funded_len = self.account_len
            + self
                .post
                .iter()
                .map(|planned| match planned.growth {
                    Growth::Funded(len) => len,
                    _ => 0,
                })
                .sum::<usize>();
        let mut covered_len = funded_len;
        let mut lengths = vec![funded_len];
        for planned in &self.post {
            if let Growth::Incremental(len) = planned.growth {
                covered_len += len;
                lengths.push(covered_len);
            }
        }
        lengths
    }

    /// Assemble the ordered instructions. `balances` holds the rent-exempt
    /// balance of each length from `rent_lengths`, in the same order.
    pub fn instructions(&self, payer: &Pubkey, balances: &[u64]) -> Vec<PlanInstruction> {
        let mut balances = balances.iter().copied();
        let mut funded = balances.next().unwrap_or_default();

        let mut instructions = vec![PlanInstruction {
            kind: None,
            instruction: system_instruction::create_account(
                payer,
                &self.mint,
                funded,
                self.account_len as u64,
                &self.owner,
            ),
        }];
        instructions.extend(self.pre.iter().map(PlanInstruction::from));
        instructions.push(PlanInstruction {
            kind: None,
            instruction: self.initialize_mint.clone(),
        });
        for planned in &self.post {
            if let Growth::Incremental(_) = planned.growth {
                let required = balances.next().unwrap_or(funded);
                if required > funded {
                    instructions.push(PlanInstruction {
                        kind: Some(planned.kind),
                        instruction: system_instruction::transfer(
                            payer,
                            &self.mint,
                            required - funded,
                        ),
                    });
                    funded = required;
                }
            }
            instructions.push(PlanInstruction::from(planned));
        }
        instructions
    }
}

impl From<&PlannedInstruction> for PlanInstruction {
    fn from(planned: &PlannedInstruction) -> Self {
        Self {
            kind: Some(planned.kind),
            instruction: planned.instruction.clone(),
        }
    }
}

fn unsigned_transaction(
    instructions: &[Instruction],
    payer: &Pubkey,
    blockhash: Hash,
) -> Transaction {
    Transaction::new_unsigned(Message::new_with_blockhash(
        instructions,
        Some(payer),
        &blockhash,
    ))
}

/// Serialized size of the transaction, with placeholder signatures
pub fn transaction_size(transaction: &Transaction) -> TokenResult<usize> {
    bincode::serialized_size(transaction)
        .map(|size| size as usize)
        .map_err(|e| ProtocolError::Encoding(e.to_string()).into())
}

/// Bytes each extension adds to the transaction, largest first
fn contributions(
    instructions: &[PlanInstruction],
    payer: &Pubkey,
    blockhash: Hash,
    full_size: usize,
) -> TokenResult<Vec<(ExtensionKind, usize)>> {
    let kinds = instructions
        .iter()
        .filter_map(|planned| planned.kind)
        .collect::<BTreeSet<_>>();
    let mut contributions = vec![];
    for kind in kinds {
        let remaining = instructions
            .iter()
            .filter(|planned| planned.kind != Some(kind))
            .map(|planned| planned.instruction.clone())
            .collect::<Vec<_>>();
        let size = transaction_size(&unsigned_transaction(&remaining, payer, blockhash))?;
        contributions.push((kind, full_size.saturating_sub(size)));
    }
    contributions.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    Ok(contributions)
}

/// Build the unsigned transaction, failing if it does not fit in a packet
pub fn build_transaction(
    instructions: &[PlanInstruction],
    payer: &Pubkey,
    blockhash: Hash,
) -> TokenResult<Transaction> {
    let transaction = unsigned_transaction(
        &instructions
            .iter()
            .map(|planned| planned.instruction.clone())
            .collect::<Vec<_>>(),
        payer,
        blockhash,
    );
    let size = transaction_size(&transaction)?;
    if size > PACKET_DATA_SIZE {
        return Err(TokenError::TransactionTooLarge {
            size,
            limit: PACKET_DATA_SIZE,
            contributions: contributions(instructions, payer, blockhash, size)?,
        });
    }
    Ok(transaction)
}

/// Compose the unsigned transaction creating the described mint.
///
/// The descriptor is validated before any ledger read. Rent lookups and the
/// blockhash lookup run concurrently.
pub async fn compose<T>(
    client: &dyn ProgramClient<T>,
    token_program_id: &Pubkey,
    fee_payer: &Pubkey,
    descriptor: &MintDescriptor,
) -> TokenResult<Transaction>
where
    T: SendTransaction,
{
    let plan = LayoutPlan::new(token_program_id, descriptor)?;
    let (balances, blockhash) = futures::try_join!(
        try_join_all(
            plan.rent_lengths()
                .into_iter()
                .map(|len| client.get_minimum_balance_for_rent_exemption(len)),
        ),
        client.get_latest_blockhash(),
    )
    .map_err(TokenError::Client)?;
    build_transaction(
        &plan.instructions(fee_payer, &balances),
        fee_payer,
        blockhash,
    )
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            error::ValidationError,
            extension::{AccountState, TokenMetadataSpec},
            layout::base_metadata_tlv_len,
        },
        spl_token_2022::instruction::TokenInstruction,
        assert_matches::assert_matches,
        solana_sdk::{rent::Rent, system_program},
    };

    fn descriptor(extensions: Vec<ExtensionSpec>) -> MintDescriptor {
        MintDescriptor {
            mint: Pubkey::new_unique(),
            decimals: 6,
            mint_authority: Pubkey::new_unique(),
            freeze_authority: None,
            extensions,
        }
    }

    fn balances(plan: &LayoutPlan) -> Vec<u64> {
        let rent = Rent::default();
        plan.rent_lengths()
            .into_iter()
            .map(|len| rent.minimum_balance(len))
            .collect()
    }

    #[test]
    fn test_plain_mint() {
        let token_program_id = spl_token_2022::id();
        let payer = Pubkey::new_unique();
        let plan = LayoutPlan::new(&token_program_id, &descriptor(vec![])).unwrap();
        assert_eq!(plan.account_len(), 82);
        assert_eq!(plan.rent_lengths(), vec![82]);

        let instructions = plan.instructions(&payer, &balances(&plan));
        assert_eq!(instructions.len(), 2);
        assert_eq!(instructions[0].instruction.program_id, system_program::id());
        assert_matches!(
            TokenInstruction::unpack(&instructions[1].instruction.data),
            Ok(TokenInstruction::InitializeMint2 { decimals: 6, .. })
        );
    }

    #[test]
    fn test_metadata_growth() {
        let token_program_id = spl_token_2022::id();
        let payer = Pubkey::new_unique();
        let metadata = TokenMetadataSpec {
            update_authority: Pubkey::new_unique(),
            name: "Gold".to_string(),
            symbol: "GLD".to_string(),
            uri: "https://example.com/gold.json".to_string(),
            additional_metadata: vec![
                ("purity".to_string(), "999.9".to_string()),
                ("vault".to_string(), "zurich".to_string()),
            ],
        };
        let plan = LayoutPlan::new(
            &token_program_id,
            &descriptor(vec![
                ExtensionSpec::TokenMetadata(metadata.clone()),
                ExtensionSpec::MetadataPointer {
                    authority: None,
                    metadata_address: None,
                },
            ]),
        )
        .unwrap();
        assert_eq!(plan.account_len(), 234);
        let funded_len = 234 + base_metadata_tlv_len(&metadata).unwrap();
        assert_eq!(
            plan.rent_lengths(),
            vec![funded_len, funded_len + 19, funded_len + 19 + 19]
        );

        let balances = balances(&plan);
        let instructions = plan.instructions(&payer, &balances);
        let kinds = instructions.iter().map(|i| i.kind).collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                None,
                Some(ExtensionKind::MetadataPointer),
                None,
                Some(ExtensionKind::TokenMetadata),
                Some(ExtensionKind::TokenMetadata),
                Some(ExtensionKind::TokenMetadata),
                Some(ExtensionKind::TokenMetadata),
                Some(ExtensionKind::TokenMetadata),
            ]
        );
        // top-ups sit right before each field update
        for (i, top_up) in [(4, balances[1] - balances[0]), (6, balances[2] - balances[1])] {
            let mint = instructions[0].instruction.accounts[1].pubkey;
            assert_eq!(
                instructions[i].instruction,
                system_instruction::transfer(&payer, &mint, top_up)
            );
        }
    }

    #[test]
    fn test_invalid_descriptor() {
        let mut invalid = descriptor(vec![ExtensionSpec::DefaultAccountState {
            state: AccountState::Frozen,
        }]);
        invalid.decimals = 12;
        assert_matches!(
            LayoutPlan::new(&Pubkey::new_unique(), &invalid),
            Err(TokenError::Validation(ValidationError::InvalidDecimals(12)))
        );
    }

    #[test]
    fn test_foreign_token_program() {
        assert_matches!(
            LayoutPlan::new(&Pubkey::new_unique(), &descriptor(vec![])),
            Err(TokenError::Protocol(ProtocolError::Encoding(_)))
        );
    }

    #[test]
    fn test_too_large() {
        let token_program_id = spl_token_2022::id();
        let payer = Pubkey::new_unique();
        let metadata = TokenMetadataSpec {
            update_authority: Pubkey::new_unique(),
            name: "n".repeat(32),
            symbol: "s".repeat(10),
            uri: "u".repeat(200),
            additional_metadata: (0..8)
                .map(|i| (format!("key-{i}"), "v".repeat(60)))
                .collect(),
        };
        let plan = LayoutPlan::new(
            &token_program_id,
            &descriptor(vec![
                ExtensionSpec::TokenMetadata(metadata),
                ExtensionSpec::Pausable {
                    authority: Pubkey::new_unique(),
                },
            ]),
        )
        .unwrap();
        let instructions = plan.instructions(&payer, &balances(&plan));
        let error = build_transaction(&instructions, &payer, Hash::new_unique()).unwrap_err();
        assert_matches!(
            &error,
            TokenError::TransactionTooLarge { size, limit, contributions }
                if *size > 1232
                    && *limit == 1232
                    && contributions[0].0 == ExtensionKind::TokenMetadata
                    && contributions[0].1 > contributions[1].1
        );
        assert!(!error.is_retryable());
    }
}
