use crate::charset::to_hex;

/// Originator type of number: abbreviated
const ABBREVIATED_NUMBER: &str = "6";
/// Originator numbering plan: SMSC specific
const SMSC_SPECIFIC: &str = "5";
/// Session type: open session
const OPEN_SESSION: &str = "1";
/// Protocol version
const VERSION: &str = "0100";

/// Session management operation (60), used to log in.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Session {
    pub oadc: String,
    pub oton: String,
    pub onpi: String,
    pub styp: String,
    /// Password, hex encoded
    pub pwd: String,
    pub npwd: String,
    pub vers: String,
    pub ladc: String,
    pub lton: String,
    pub lnpi: String,
    pub opid: String,
    pub res1: String,
}

impl Session {
    /// Open-session request for `user`
    pub fn login(user: &str, password: &str) -> Self {
        Session {
            oadc: user.to_string(),
            oton: ABBREVIATED_NUMBER.to_string(),
            onpi: SMSC_SPECIFIC.to_string(),
            styp: OPEN_SESSION.to_string(),
            pwd: to_hex(password.as_bytes()),
            vers: VERSION.to_string(),
            ..Default::default()
        }
    }

    pub fn fields(&self) -> [&str; 12] {
        [
            &self.oadc, &self.oton, &self.onpi, &self.styp, &self.pwd, &self.npwd, &self.vers,
            &self.ladc, &self.lton, &self.lnpi, &self.opid, &self.res1,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_frame;
    use crate::datatypes::Operation;

    #[test]
    fn test_login_frame() {
        let frame = encode_frame(
            "00",
            &Operation::Session(Session::login("emi_client", "password")),
        );
        assert_eq!(
            frame.as_ref(),
            b"\x0200/00061/O/60/emi_client/6/5/1/70617373776F7264//0100//////D1\x03"
        );
    }
}
