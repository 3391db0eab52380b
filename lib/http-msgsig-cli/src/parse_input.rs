use crate::util::{highlight, Outcome};
use http_msgsig::{input, SignatureParams};

/// Split the header into its members, keeping track of where each value starts
///
/// A value starting with `(` is treated as a single unlabeled member
fn members(header: &str) -> miette::Result<Vec<(Option<&str>, usize, &str)>> {
    if header.starts_with('(') {
        return Ok(vec![(None, 0, header)]);
    }

    let mut members = Vec::new();
    let mut offset = 0;
    for member in header.split(", ") {
        let Some((label, value)) = member.split_once('=') else {
            miette::bail!(
                "Member {member:?} is missing its label {}",
                Outcome::Invalid
            );
        };

        members.push((Some(label), offset + label.len() + 1, value));
        offset += member.len() + ", ".len();
    }

    Ok(members)
}

fn print_params(label: Option<&str>, params: &SignatureParams<'_>) {
    println!("{}", highlight(label.unwrap_or("(unlabeled)")));
    println!("  components: {}", params.components.join(" "));
    println!("  keyid:      {}", params.key_id);

    if let Some(algorithm) = params.algorithm {
        println!("  alg:        {algorithm}");
    }
    if let Some(created) = params.created {
        println!("  created:    {created}");
    }
    if let Some(expires) = params.expires {
        println!("  expires:    {expires}");
    }
    if let Some(nonce) = params.nonce {
        println!("  nonce:      {nonce}");
    }
}

pub fn do_it(header: &'static str) -> miette::Result<()> {
    for (label, offset, value) in members(header)? {
        match input::parse(value) {
            Ok(params) => print_params(label, &params),
            Err(mut err) => {
                err.span = (err.span.offset() + offset, err.span.len()).into();
                return Err(miette::Error::new(err).with_source_code(header));
            }
        }
    }

    println!("✅ Header is valid! {}", Outcome::Valid);

    Ok(())
}

#[cfg(test)]
mod test {
    use super::members;

    #[test]
    fn unlabeled() {
        let header = r#"("@method");keyid="test""#;
        assert_eq!(members(header).unwrap(), [(None, 0, header)]);
    }

    #[test]
    fn labeled_offsets() {
        let header = r#"sig1=("@method");keyid="a", sig2=("@path");keyid="b""#;
        let members = members(header).unwrap();

        assert_eq!(members.len(), 2);
        for (label, offset, value) in members {
            assert!(label.is_some());
            assert_eq!(&header[offset..offset + value.len()], value);
        }
    }

    #[test]
    fn missing_label() {
        assert!(members("sig1=(\"@method\");keyid=\"a\", garbage").is_err());
    }
}
