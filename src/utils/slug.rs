use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};

/// Lowercase ASCII slug: alphanumeric runs joined by single dashes.
///
/// Accented Latin letters fold to their base letters. Any other non-ASCII character
/// separates words like punctuation does, so a name made only of them yields an
/// empty string.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        let mut buf = [0; 4];
        let part = if c.is_ascii_alphanumeric() {
            Some(&*c.encode_utf8(&mut buf))
        } else {
            fold_latin(c)
        };
        match part {
            Some(part) => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push_str(part);
            }
            None => pending_dash = true,
        }
    }

    slug
}

/// ASCII spelling of a lowercase accented Latin letter.
fn fold_latin(c: char) -> Option<&'static str> {
    let ascii = match c {
        'à'..='å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'ĉ' | 'ċ' | 'č' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è'..='ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => "e",
        'ĝ' | 'ğ' | 'ġ' | 'ģ' => "g",
        'ĥ' | 'ħ' => "h",
        'ì'..='ï' | 'ĩ' | 'ī' | 'ĭ' | 'į' | 'ı' => "i",
        'ĵ' => "j",
        'ķ' => "k",
        'ĺ' | 'ļ' | 'ľ' | 'ŀ' | 'ł' => "l",
        'ñ' | 'ń' | 'ņ' | 'ň' => "n",
        'ò'..='ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => "o",
        'œ' => "oe",
        'ŕ' | 'ŗ' | 'ř' => "r",
        'ś' | 'ŝ' | 'ş' | 'š' => "s",
        'ß' => "ss",
        'ţ' | 'ť' | 'ŧ' => "t",
        'þ' => "th",
        'ù'..='ü' | 'ũ' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => "u",
        'ŵ' => "w",
        'ý' | 'ÿ' | 'ŷ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(ascii)
}

/// Slug for `name` that no row of `E` holds in `column` yet.
///
/// Tries the bare slug first, then appends `-2`, `-3`, ... until a free one is found.
/// `fallback` is used as the base when `name` has no sluggable characters.
///
/// # Errors
///
/// Returns an error if a lookup query fails.
pub async fn unique_slug<E, C>(
    conn: &C,
    column: E::Column,
    name: &str,
    fallback: &str,
) -> Result<String, DbErr>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let mut base = slugify(name);
    if base.is_empty() {
        base = fallback.to_string();
    }

    let mut candidate = base.clone();
    let mut suffix = 2_u32;
    while E::find()
        .filter(column.eq(candidate.as_str()))
        .one(conn)
        .await?
        .is_some()
    {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }

    Ok(candidate)
}
