//! Identity: a key pair with every derived address and WIF form.

use opensig_primitives::ec::{PrivateKey, PublicKey};

use crate::format::substitute;

/// Chain code used in `OPENSIG-<address>-<chain>` identifiers.
pub const DEFAULT_CHAIN_CODE: &str = "btc";

/// Default rendering: address, WIF and label separated by tabs.
pub const FORMAT_DEFAULT: &str = "<pub>\t<wif>\t<label>";

/// Multi-line rendering selected with `"<full>"`.
pub const FORMAT_FULL: &str = "\nlabel                   : <label>\nidentity                : <id>\nprivate key             : <priv>\nwif compressed          : <wifc>\nwif uncompressed        : <wifu>\npublic key compressed   : <pubc>\npublic key uncompressed : <pubu>\n";

/// An immutable key pair with an optional label.
///
/// The compressed address and WIF are the active forms returned by
/// [`Identity::public_key`] and [`Identity::wif`].
#[derive(Clone)]
pub struct Identity {
    private_key: PrivateKey,
    public_key: PublicKey,
    address_compressed: String,
    address_uncompressed: String,
    label: Option<String>,
}

impl Identity {
    /// Build an identity around `private_key`.
    ///
    /// The label is trimmed; an empty label or the text `undefined` means no
    /// label.
    pub fn new(private_key: PrivateKey, label: Option<&str>) -> Self {
        let public_key = private_key.pub_key();
        Identity {
            address_compressed: public_key.to_address(true),
            address_uncompressed: public_key.to_address(false),
            private_key,
            public_key,
            label: normalize_label(label),
        }
    }

    /// A fresh random identity.
    pub fn random(label: Option<&str>) -> Self {
        Self::new(PrivateKey::new(), label)
    }

    /// Private key as 64 lowercase hex digits.
    pub fn private_key_hex(&self) -> String {
        self.private_key.to_hex()
    }

    /// The active (compressed) address.
    pub fn public_key(&self) -> &str {
        &self.address_compressed
    }

    /// Address of the compressed public key.
    pub fn public_key_compressed(&self) -> &str {
        &self.address_compressed
    }

    /// Address of the uncompressed public key.
    pub fn public_key_uncompressed(&self) -> &str {
        &self.address_uncompressed
    }

    /// The active (compressed) WIF.
    pub fn wif(&self) -> String {
        self.private_key.to_wif_compressed()
    }

    /// Compressed WIF.
    pub fn wif_compressed(&self) -> String {
        self.private_key.to_wif_compressed()
    }

    /// Uncompressed WIF.
    pub fn wif_uncompressed(&self) -> String {
        self.private_key.to_wif_uncompressed()
    }

    /// The label, if any.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The key material used for signing.
    pub fn signing_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// The secp256k1 public key.
    pub fn ec_public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// `OPENSIG-<address>-btc`.
    pub fn id(&self) -> String {
        format!("OPENSIG-{}-{}", self.address_compressed, DEFAULT_CHAIN_CODE)
    }

    /// Render with a `<key>` template.
    ///
    /// An empty template selects [`FORMAT_DEFAULT`], `"<full>"` selects
    /// [`FORMAT_FULL`]. Keys: `<label> <id> <pub> <priv> <wif> <wifc> <wifu>
    /// <pubc> <pubu>`.
    pub fn format(&self, template: &str) -> String {
        let template = match template {
            "" => FORMAT_DEFAULT,
            "<full>" => FORMAT_FULL,
            other => other,
        };
        let fields = [
            ("label", self.label.clone().unwrap_or_default()),
            ("id", self.id()),
            ("pub", self.address_compressed.clone()),
            ("priv", self.private_key_hex()),
            ("wif", self.wif()),
            ("wifc", self.wif_compressed()),
            ("wifu", self.wif_uncompressed()),
            ("pubc", self.address_compressed.clone()),
            ("pubu", self.address_uncompressed.clone()),
        ];
        substitute(template, &fields)
    }
}

fn normalize_label(label: Option<&str>) -> Option<String> {
    let trimmed = label?.trim();
    match trimmed {
        "" | "undefined" => None,
        _ => Some(trimmed.to_string()),
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.private_key == other.private_key && self.label == other.label
    }
}

impl Eq for Identity {}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("public_key", &self.address_compressed)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format(""))
    }
}
