pub trait NormalizeDigits {
    fn normalize_digits(&self) -> String;
}

// ０７日 -> 07日, handwriting OCR likes to return full-width digits
impl NormalizeDigits for str {
    fn normalize_digits(&self) -> String {
        self.chars()
            .map(|c| match c {
                '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
                _ => c,
            })
            .collect()
    }
}

impl NormalizeDigits for String {
    fn normalize_digits(&self) -> String {
        self.as_str().normalize_digits()
    }
}
