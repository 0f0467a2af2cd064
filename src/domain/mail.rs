/// A message ready to be handed to a mail transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}
