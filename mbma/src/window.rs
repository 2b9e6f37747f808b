//! Context windows fed to the label oracle.

/// Number of characters on the left of the focus character.
pub const LEFT: usize = 6;

/// Number of characters on the right of the focus character.
pub const RIGHT: usize = 6;

/// Number of character fields in one instance.
pub const WINDOW_SIZE: usize = LEFT + RIGHT + 1;

/// Filler used for positions outside of the word.
pub const OUT_OF_RANGE: char = '_';

/// Replacement for a comma inside the word, since the comma separates fields.
pub const COMMA_ESCAPE: char = 'C';

/// Separator appended after each field.
pub const FIELD_SEPARATOR: char = ',';

/// Trailing marker of a query instance.
pub const QUERY_MARKER: char = '?';

/// Generates one instance per character of a lowercased word.
///
/// # Arguments
///
/// * `word` - A lowercased word.
///
/// # Returns
///
/// Instances in left-to-right order.
///
/// # Examples
///
/// ```
/// use mbma::window::make_instances;
///
/// let insts = make_instances("ab");
/// assert_eq!(2, insts.len());
/// assert_eq!("_,_,_,_,_,_,a,b,_,_,_,_,_,?", insts[0]);
/// ```
pub fn make_instances(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut instances = Vec::with_capacity(chars.len());
    for i in 0..chars.len() {
        let mut inst = String::with_capacity(WINDOW_SIZE * 2 + 1);
        for j in i..=i + LEFT + RIGHT {
            let c = if j < LEFT || j >= chars.len() + LEFT {
                OUT_OF_RANGE
            } else {
                match chars[j - LEFT] {
                    FIELD_SEPARATOR => COMMA_ESCAPE,
                    c => c,
                }
            };
            inst.push(c);
            inst.push(FIELD_SEPARATOR);
        }
        inst.push(QUERY_MARKER);
        tracing::trace!("inst #{}: {}", i, inst);
        instances.push(inst);
    }
    instances
}
