use crate::domain::model::{Digest, Opportunity};
use std::fmt::Write;

pub fn compose(matches: &[Opportunity]) -> Digest {
    let subject = format!("🚨 {} New SAM.gov Vehicle Contracts", matches.len());

    let mut body = String::from("New vehicle-related opportunities:\n\n");
    for opp in matches {
        // String 寫入不會失敗
        let _ = write!(
            body,
            "- {}\n  Due: {}\n  {}\n\n",
            opp.title,
            opp.response_deadline,
            opp.detail_link()
        );
    }

    Digest { subject, body }
}
