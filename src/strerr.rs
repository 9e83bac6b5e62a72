pub trait Strerr<T> {
    fn strerr(self) -> Result<T, String>;

    fn context(self, what: &str) -> Result<T, String>
    where
        Self: Sized,
    {
        self.strerr().map_err(|e| format!("{what}: {e}"))
    }
}

impl<T, U: ToString> Strerr<T> for Result<T, U> {
    fn strerr(self) -> Result<T, String> {
        self.map_err(|e| e.to_string())
    }
}

impl<T> Strerr<T> for Option<T> {
    fn strerr(self) -> Result<T, String> {
        self.ok_or_else(|| "missing value".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_prefixes_message() {
        let r: Result<(), &str> = Err("bad");
        assert_eq!(r.context("loading"), Err("loading: bad".to_string()));
    }

    #[test]
    fn none_becomes_error() {
        assert!(None::<u8>.strerr().is_err());
        assert_eq!(Some(3).strerr(), Ok(3));
    }
}
