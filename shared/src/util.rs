/// 現在の UTC タイムスタンプ（ミリ秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Generate an opaque record ID: millisecond timestamp plus a random
/// suffix, both base36. Sortable by creation time, collision-free at
/// single-studio scale.
pub fn record_id() -> String {
    use rand::Rng;
    let ts = to_base36(now_millis() as u64);
    let suffix: u32 = rand::thread_rng().gen_range(0..36u32.pow(4));
    format!("{}{:0>4}", ts, to_base36(suffix as u64))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Overwrite `slot` only when the patch carries a value.
///
/// The single partial-merge primitive used by every update path: fields
/// absent from a patch retain their prior value, per-field last-writer-wins.
pub fn merge_field<T>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}
