use primitive_types::U256;

use crate::{Error, Sink, Source};

/// Cross-chain transfer arguments as understood by the relay
/// contracts on both chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxArgs {
    pub asset_hash: Vec<u8>,
    pub address: Vec<u8>,
    pub amount: U256,
}

impl TxArgs {
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let mut sink = Sink::with_capacity(self.asset_hash.len() + self.address.len() + 34);
        sink.write_var_bytes(&self.asset_hash);
        sink.write_var_bytes(&self.address);
        sink.write_u256(self.amount)?;
        Ok(sink.into_bytes())
    }

    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        let mut source = Source::new(bytes);
        let asset_hash = source.read_var_bytes()?.to_vec();
        let address = source.read_var_bytes()?.to_vec();
        let amount = source.read_u256()?;
        Ok(TxArgs {
            asset_hash,
            address,
            amount,
        })
    }
}
