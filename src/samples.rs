//! Built-in sample articles used by `--populate`.

use crate::models::{Phase, RecordDraft, Role};

fn article(
    title: &str,
    content: &str,
    phase: Phase,
    tags: &[&str],
    roles: &[Role],
    source: &str,
) -> RecordDraft {
    RecordDraft {
        roles: roles.to_vec(),
        ..RecordDraft::new(
            title,
            content,
            phase,
            tags.iter().map(|t| t.to_string()).collect(),
            source,
        )
    }
}

/// Five event-management articles covering ticketing, marketing,
/// sponsorships and live operations.
pub fn sample_articles() -> Vec<RecordDraft> {
    vec![
        article(
            "Stripe Connect Setup for Event Payments",
            "Setting up Stripe Connect for event payments involves several key steps:\n\n\
             1. Create Stripe Account: Register for a Stripe account and complete verification\n\
             2. Enable Connect: Navigate to Connect settings and enable the platform\n\
             3. Configure Webhooks: Set up webhook endpoints for payment events\n\
             4. Test Integration: Use Stripe's test mode to verify functionality\n\
             5. Go Live: Switch to live mode after successful testing\n\n\
             Best practices include implementing proper error handling, \
             setting up monitoring for failed payments, and maintaining \
             compliance with local regulations.",
            Phase::Ticketing,
            &["stripe", "api"],
            &[Role::Finance, Role::Organizer],
            "stripe-connect-guide",
        ),
        article(
            "WhatsApp Marketing Automation for Events",
            "Automate your event marketing with WhatsApp Business API:\n\n\
             1. Setup WhatsApp Business: Register and verify your business account\n\
             2. Create Message Templates: Design approved message templates\n\
             3. Build Contact Lists: Organize contacts by event interest and demographics\n\
             4. Schedule Campaigns: Plan and schedule marketing messages\n\
             5. Track Engagement: Monitor open rates, clicks, and conversions\n\n\
             Key features include broadcast messaging, automated responses, \
             and integration with CRM systems for lead management.",
            Phase::Marketing,
            &["whatsapp", "api", "automation"],
            &[Role::Marketing, Role::Organizer],
            "whatsapp-marketing-guide",
        ),
        article(
            "Sponsor ROI Tracking and Analytics",
            "Track and measure sponsor return on investment effectively:\n\n\
             1. Define KPIs: Establish clear metrics for sponsor value\n\
             2. Data Collection: Gather attendee demographics and engagement data\n\
             3. Analytics Dashboard: Create visual reports for sponsors\n\
             4. Regular Reporting: Provide monthly updates to sponsors\n\
             5. Optimization: Use data to improve future sponsor packages\n\n\
             Essential metrics include brand exposure, lead generation, \
             social media reach, and direct sales attribution.",
            Phase::Sponsorships,
            &["analytics"],
            &[Role::Sales, Role::Finance, Role::Organizer],
            "sponsor-roi-guide",
        ),
        article(
            "Event Registration Form Best Practices",
            "Create effective event registration forms that maximize conversions:\n\n\
             1. Keep It Simple: Minimize required fields to reduce friction\n\
             2. Mobile Optimization: Ensure forms work perfectly on mobile devices\n\
             3. Clear CTAs: Use compelling call-to-action buttons\n\
             4. Progress Indicators: Show completion progress for multi-step forms\n\
             5. Validation: Implement real-time form validation\n\n\
             Additional tips include A/B testing different form layouts, \
             offering multiple payment options, and providing clear \
             cancellation and refund policies.",
            Phase::Ticketing,
            &[],
            &[Role::Organizer, Role::Marketing],
            "registration-forms-guide",
        ),
        article(
            "Event Day Operations Checklist",
            "Comprehensive checklist for smooth event day operations:\n\n\
             1. Pre-Event Setup: Arrive early to set up registration, signage, and AV\n\
             2. Staff Briefing: Conduct team meeting with clear role assignments\n\
             3. Registration Management: Ensure smooth attendee check-in process\n\
             4. Vendor Coordination: Manage food, security, and other vendors\n\
             5. Emergency Procedures: Have backup plans for common issues\n\n\
             Critical areas include crowd management, safety protocols, \
             communication systems, and contingency planning for \
             weather or technical difficulties.",
            Phase::LiveEvent,
            &[],
            &[Role::Operations, Role::Organizer],
            "event-day-checklist",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TECHNICAL_TAGS;

    #[test]
    fn test_samples_are_well_formed() {
        let samples = sample_articles();
        assert_eq!(samples.len(), 5);
        for s in &samples {
            assert!(!s.content.is_empty());
            assert!(!s.roles.is_empty());
            assert_eq!(s.language, "en");
            for tag in &s.tags {
                assert!(TECHNICAL_TAGS.contains(&tag.as_str()), "{}", tag);
            }
        }
    }

    #[test]
    fn test_stripe_article_wording() {
        let samples = sample_articles();
        let stripe = &samples[0];
        assert_eq!(stripe.title, "Stripe Connect Setup for Event Payments");
        assert!(stripe.content.ends_with(
            "Best practices include implementing proper error handling, \
             setting up monitoring for failed payments, and maintaining \
             compliance with local regulations."
        ));
        assert!(!stripe.content.contains("refund"));
    }

    #[test]
    fn test_sample_phases() {
        let phases: Vec<Phase> = sample_articles().iter().map(|s| s.phase).collect();
        assert_eq!(
            phases,
            vec![
                Phase::Ticketing,
                Phase::Marketing,
                Phase::Sponsorships,
                Phase::Ticketing,
                Phase::LiveEvent
            ]
        );
    }
}
