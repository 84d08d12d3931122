//! Tests for the opensig-transaction crate.
//!
//! The expected transactions were produced independently for the same
//! key, unspent outputs and destinations, so matching them byte for byte
//! pins the serialization, the legacy sighash and RFC6979 signing together.

use opensig_primitives::ec::{PrivateKey, PublicKey, Signature};

use crate::builder::TransactionBuilder;
use crate::sighash::{self, SIGHASH_ALL};
use crate::template::p2pkh;
use crate::{Address, TransactionError};

const SIGNER_WIF: &str = "L33c5Gv8Ggt99PFDPieZ5fk56u1dZVChjGsHbrRAz9yagytNs32a";
const SIGNER_ADDRESS: &str = "1M9jofAErijG4eiPUy19Qxot1KkPRRzyet";
const FILE_ADDRESS: &str = "13hCoaeW632HQHpzvMmiyNbVWk8Bfpvz14";

const SINGLE_TXID: &str = "b20d6599f5ba38780437df1618e4c18c77ab4af8c7390d7bd1fcd9aaa826d4c6";
const SINGLE_HEX: &str = "010000000109882232243a0ff09bf0fe98f3be6130935642d11508c38d22724a81a24cd813010000006a473044022031f9e571cdd69f031f708ba53f7a46973812ae2baaf00b39400dcc94ed1b317802205da9f847380ebbbcd402c4229694d64ba81f96808e8cde82c2e0a7f554dca839012103ef12ef92ab520c62061e07186faac5ef43e835a3ef63ddd1437d15e9fcb0dab3000000000236150000000000001976a9141d8abe268642dda7228be625e425749f0fc5467988ac04e70000000000001976a914dd09932106e2fd0f296b726da9cb5cf142648e9588ac00000000";

const ONE_SATOSHI_TXID: &str = "4161519151a96133a50254ebd7d048045fb2f98e1324da4db90ec72dbe553ea8";
const ONE_SATOSHI_HEX: &str = "010000000109882232243a0ff09bf0fe98f3be6130935642d11508c38d22724a81a24c181b010000006b483045022100a857c1560a8c618f7326a968b28b1ab12fc4271cf74a9602d593e083df1b78d3022079b4f0d88d7d6e4277fea7b43d9d91396882cdf7526ec25a6e96f1818a3023d7012103ef12ef92ab520c62061e07186faac5ef43e835a3ef63ddd1437d15e9fcb0dab3000000000201000000000000001976a9141d8abe268642dda7228be625e425749f0fc5467988ac9f860100000000001976a914dd09932106e2fd0f296b726da9cb5cf142648e9588ac00000000";

/// Display-order id of the n-th funding transaction in the multi-output set.
fn funding_id(n: u32) -> String {
    format!("1b{}84ca2814a72228dc30815d14256933061bef398fef09bf00f3a2432228809", n)
}

fn signer() -> PrivateKey {
    PrivateKey::from_wif(SIGNER_WIF).unwrap()
}

#[test]
fn test_single_input_with_change() {
    let key = signer();
    let mut builder = TransactionBuilder::new();
    builder
        .add_input("13d84ca2814a72228dc30815d14256933061bef398fef09bf00f3a2432228809", 1, 0)
        .unwrap();
    builder.add_output(FILE_ADDRESS, 5430).unwrap();
    builder.add_output(SIGNER_ADDRESS, 59140).unwrap();
    builder.sign(0, &key).unwrap();

    let built = builder.build().unwrap();
    assert_eq!(built.hex, SINGLE_HEX);
    assert_eq!(built.id, SINGLE_TXID);
}

#[test]
fn test_one_satoshi_payment() {
    let key = signer();
    let mut builder = TransactionBuilder::new();
    builder.add_input(&funding_id(1), 1, 0).unwrap();
    builder.add_output(FILE_ADDRESS, 1).unwrap();
    builder.add_output(SIGNER_ADDRESS, 99999).unwrap();
    builder.sign(0, &key).unwrap();

    let built = builder.build().unwrap();
    assert_eq!(built.hex, ONE_SATOSHI_HEX);
    assert_eq!(built.id, ONE_SATOSHI_TXID);
}

#[test]
fn test_five_inputs_no_change() {
    let key = signer();
    let mut builder = TransactionBuilder::new();
    for (sequence, n) in [1u32, 5, 2, 4, 3].into_iter().enumerate() {
        builder.add_input(&funding_id(n), n, sequence as u32).unwrap();
    }
    builder.add_output(FILE_ADDRESS, 1_490_000).unwrap();
    for i in 0..5 {
        builder.sign(i, &key).unwrap();
    }

    let built = builder.build().unwrap();
    assert_eq!(
        built.id,
        "d984471d35bc97804ba6bed6e10f040a724425d7f97662e6e6bcbbac16b51ac4"
    );
}

#[test]
fn test_signatures_verify_against_sighash() {
    let key = signer();
    let mut builder = TransactionBuilder::new();
    builder.add_input(&funding_id(5), 5, 0).unwrap();
    builder.add_input(&funding_id(4), 4, 1).unwrap();
    builder.add_output(FILE_ADDRESS, 500_001).unwrap();
    builder.add_output(SIGNER_ADDRESS, 399_999).unwrap();
    builder.sign(1, &key).unwrap();
    builder.sign(0, &key).unwrap();

    let prev_lock = p2pkh::lock(&Address::from_string(SIGNER_ADDRESS).unwrap());
    let tx = builder.transaction();
    for (i, input) in tx.inputs.iter().enumerate() {
        let script = input.unlocking_script.as_ref().unwrap().to_bytes();
        let sig_len = script[0] as usize;
        assert_eq!(script[sig_len], SIGHASH_ALL as u8);
        let sig = Signature::from_der(&script[1..sig_len]).unwrap();
        let pub_key = PublicKey::from_bytes(&script[sig_len + 2..]).unwrap();

        let hash = sighash::signature_hash(tx, i, prev_lock.to_bytes(), SIGHASH_ALL).unwrap();
        assert!(pub_key.verify(&hash, &sig), "input {} signature should verify", i);
    }
    assert_eq!(
        builder.build().unwrap().id,
        "8c60b7e1474f90f25f3ea368ad01d92d60e6a480626e00882e9db3cc7fa6997b"
    );
}

#[test]
fn test_add_input_rejects_malformed_ids() {
    let mut builder = TransactionBuilder::new();
    assert!(matches!(
        builder.add_input("1b1", 1, 0),
        Err(TransactionError::InvalidInput(_))
    ));
    assert!(matches!(
        builder.add_input(&"zz".repeat(32), 1, 0),
        Err(TransactionError::InvalidInput(_))
    ));
    assert!(builder.transaction().inputs.is_empty());
}

#[test]
fn test_add_output_rejects_bad_address() {
    let mut builder = TransactionBuilder::new();
    assert!(matches!(
        builder.add_output("1M9jofAErijG4eiPUy19Qxot1KkPRRzyeu", 1),
        Err(TransactionError::InvalidAddress(_))
    ));
}

#[test]
fn test_build_requires_every_input_signed() {
    let key = signer();
    let mut builder = TransactionBuilder::new();
    builder.add_input(&funding_id(1), 1, 0).unwrap();
    builder.add_input(&funding_id(2), 2, 1).unwrap();
    builder.add_output(FILE_ADDRESS, 1).unwrap();
    builder.sign(0, &key).unwrap();
    assert!(matches!(builder.build(), Err(TransactionError::InvalidTransaction(_))));
    assert!(TransactionBuilder::new().build().is_err());
}

#[test]
fn test_shape_is_frozen_after_signing() {
    let key = signer();
    let mut builder = TransactionBuilder::new();
    builder.add_input(&funding_id(1), 1, 0).unwrap();
    builder.add_output(FILE_ADDRESS, 1).unwrap();
    builder.sign(0, &key).unwrap();
    assert!(builder.add_output(SIGNER_ADDRESS, 1).is_err());
    assert!(builder.add_input(&funding_id(2), 2, 1).is_err());
}

#[test]
fn test_sign_errors() {
    let key = signer();
    let mut builder = TransactionBuilder::new();
    builder.add_input(&funding_id(1), 1, 0).unwrap();
    // no outputs yet
    assert!(matches!(builder.sign(0, &key), Err(TransactionError::SigningError(_))));
    builder.add_output(FILE_ADDRESS, 1).unwrap();
    assert!(matches!(builder.sign(3, &key), Err(TransactionError::SigningError(_))));
}

#[test]
fn test_sighash_rejects_other_types() {
    let mut builder = TransactionBuilder::new();
    builder.add_input(&funding_id(1), 1, 0).unwrap();
    builder.add_output(FILE_ADDRESS, 1).unwrap();
    assert!(sighash::signature_hash(builder.transaction(), 0, &[], 0x41).is_err());
}
