/// Seat letters across one cabin row
pub const SEAT_LETTERS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Seat labels offered for a flight with `count` open seats: `1A..1F`, `2A..`, truncated to `count`.
pub fn seat_map(count: u32) -> Vec<String> {
    (0..count)
        .map(|i| {
            let row = i / SEAT_LETTERS.len() as u32 + 1;
            let letter = SEAT_LETTERS[(i % SEAT_LETTERS.len() as u32) as usize];
            format!("{}{}", row, letter)
        })
        .collect()
}
