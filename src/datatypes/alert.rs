/// PC application over TCP/IP
const PC_APP_OVER_TCP_IP: &str = "0539";

/// Alert operation (31), sent periodically as a keep-alive ping.
#[derive(Clone, Debug, PartialEq)]
pub struct Alert {
    pub adc: String,
    pub pid: String,
}

impl Alert {
    pub fn ping(user: &str) -> Self {
        Alert {
            adc: user.to_string(),
            pid: PC_APP_OVER_TCP_IP.to_string(),
        }
    }

    pub fn fields(&self) -> [&str; 2] {
        [&self.adc, &self.pid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_frame;
    use crate::datatypes::Operation;

    #[test]
    fn test_ping_frame() {
        let frame = encode_frame("01", &Operation::Alert(Alert::ping("emi_client")));
        assert_eq!(frame.as_ref(), b"\x0201/00032/O/31/emi_client/0539/0D\x03");
    }
}
