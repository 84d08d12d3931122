//! Human readable rendering of signature records.

use opensig_ledger::SignatureRecord;

use crate::format::substitute;

/// Default rendering: time, signer id and label separated by tabs.
pub const SIGNATURE_FORMAT_DEFAULT: &str = "<longtime>\t<id>\t<label>";

/// `<key>` template rendering for [`SignatureRecord`].
pub trait SignatureFormat {
    /// `OPENSIG-<signer>-<chain>`.
    fn signer_id(&self) -> String;

    /// Render with `template`, or [`SIGNATURE_FORMAT_DEFAULT`] when `None`.
    ///
    /// Keys: `<label> <id> <pub> <time> <longtime>`; `<time>` is Unix
    /// seconds and `<longtime>` looks like `Mon, 28 Mar 2016 13:31:08 GMT`.
    fn format(&self, template: Option<&str>) -> String;
}

impl SignatureFormat for SignatureRecord {
    fn signer_id(&self) -> String {
        format!("OPENSIG-{}-{}", self.signer_address, self.chain_code)
    }

    fn format(&self, template: Option<&str>) -> String {
        let fields = [
            ("label", self.label.clone().unwrap_or_default()),
            ("id", self.signer_id()),
            ("pub", self.signer_address.clone()),
            ("time", self.time.timestamp().to_string()),
            ("longtime", self.time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()),
        ];
        substitute(template.unwrap_or(SIGNATURE_FORMAT_DEFAULT), &fields)
    }
}
