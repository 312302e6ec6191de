use num_bigint::BigUint;

const WEI_DECIMALS: usize = 18;

pub fn format_ether(wei: &BigUint) -> String {
    let digits = wei.to_str_radix(10);
    let (whole, fraction) = if digits.len() > WEI_DECIMALS {
        let (whole, fraction) = digits.split_at(digits.len() - WEI_DECIMALS);
        (whole.to_owned(), fraction.to_owned())
    } else {
        ("0".to_owned(), format!("{:0>width$}", digits, width = WEI_DECIMALS))
    };
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{fraction}")
    }
}

pub fn shorten_address(address: &str) -> String {
    if address.len() <= 10 || !address.is_ascii() {
        return address.to_owned();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}
