//! Default French-language recruitment email.

pub const RECIPIENT: &str = "etude@example.com";

pub const SUBJECT: &str = "Participation à l'étude";

pub const BODY: &str = "Je suis intéressé(e) à participer à votre étude. \
                        Vous pouvez me contacter à cette adresse e-mail ou \
                        m'appeler au [votre numéro].";
