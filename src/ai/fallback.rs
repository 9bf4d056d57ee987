//! Deterministic report text used when no completion backend answers.
//!
//! Both functions are pure and never fail; the only variable part is the
//! topic.

/// Fallback for plain reports. Section headings end with a colon.
pub fn basic_report(topic: &str) -> String {
    format!(
        r#"Executive Summary:
This comprehensive report examines {topic} from multiple perspectives, providing insights into current trends, challenges, and future opportunities. Our analysis reveals significant developments in this field that warrant attention from stakeholders and decision-makers.

Introduction and Background:
{topic} has emerged as a critical area of focus in today's rapidly evolving landscape. Understanding its implications requires a thorough examination of historical context, current applications, and future potential. This report aims to provide a detailed analysis that can inform strategic decision-making.

Current State Analysis:
The current state of {topic} is characterized by rapid growth and innovation. Key players in the market are investing heavily in research and development, leading to breakthrough technologies and methodologies. Market adoption rates have shown consistent upward trends, indicating strong demand and acceptance.

Key market indicators include:
• Increased investment from venture capital and institutional investors
• Growing number of specialized companies and startups
• Expansion of use cases across various industries
• Enhanced regulatory frameworks and standards

Key Findings and Insights:
Our research has identified several critical findings regarding {topic}:

1. Market Growth: The sector has experienced unprecedented growth rates, with projections indicating continued expansion over the next five years.

2. Technology Advancement: Significant technological breakthroughs have improved efficiency, accuracy, and accessibility.

3. Industry Adoption: Major corporations across various sectors are implementing solutions related to {topic}, driving mainstream acceptance.

4. Consumer Behavior: End-user preferences and behaviors are evolving, creating new opportunities for innovation and service delivery.

Challenges and Opportunities:
While {topic} presents numerous opportunities, several challenges must be addressed:

Challenges:
• Regulatory uncertainty in some jurisdictions
• Skills gap in the workforce
• Infrastructure limitations
• Privacy and security concerns
• Cost barriers for smaller organizations

Opportunities:
• Emerging markets showing high growth potential
• Cross-industry collaboration possibilities
• Innovation in supporting technologies
• Government initiatives and funding programs
• Increasing consumer awareness and demand

Future Trends and Predictions:
Based on current trajectories and expert analysis, we anticipate several key trends in {topic}:

1. Increased Automation: Greater integration of automated systems and processes
2. Enhanced User Experience: Focus on intuitive interfaces and user-centric design
3. Sustainability Integration: Growing emphasis on environmental and social responsibility
4. Global Standardization: Development of universal standards and protocols
5. Democratization: Increased accessibility for smaller organizations and individuals

Recommendations:
Based on our analysis, we recommend the following strategic actions:

1. Investment Strategy: Organizations should consider strategic investments in {topic} to maintain competitive advantage.

2. Skill Development: Invest in training and development programs to build internal capabilities.

3. Partnership Opportunities: Explore collaborative partnerships with technology providers and industry leaders.

4. Risk Management: Develop comprehensive risk assessment and mitigation strategies.

5. Regulatory Compliance: Stay informed about evolving regulations and ensure compliance frameworks are in place.

Conclusion:
{topic} represents a significant opportunity for organizations willing to embrace innovation and adapt to changing market conditions. While challenges exist, the potential benefits far outweigh the risks for those who approach implementation strategically.

Success in this domain requires a balanced approach that considers technological capabilities, market dynamics, regulatory requirements, and organizational readiness. Organizations that act decisively while maintaining flexibility will be best positioned to capitalize on the opportunities presented by {topic}.

The landscape will continue to evolve rapidly, making it essential for stakeholders to remain informed and agile in their approach. Regular reassessment of strategies and objectives will be crucial for long-term success in this dynamic environment."#
    )
}

/// Fallback for context and history reports. Section headings use `#`.
pub fn enhanced_report(topic: &str) -> String {
    format!(
        r#"# Executive Summary
This report provides a comprehensive analysis of {topic}, examining current trends, challenges, and opportunities in this dynamic field.

# Introduction and Background
{topic} represents a significant area of interest in today's business and technology landscape. This analysis explores various aspects of this domain to provide actionable insights.

# Current State Analysis
The current state of {topic} is characterized by rapid evolution and innovation. Key developments include technological advancements, market expansion, and regulatory changes.

# Key Findings and Insights
• Growing market demand and adoption
• Technological innovation driving growth
• Regulatory environment evolving
• Competitive landscape intensifying

# Challenges and Opportunities
Challenges include regulatory uncertainty and market volatility. Opportunities exist in emerging markets and technological innovation.

# Future Trends and Predictions
Continued growth expected with increased automation and digital transformation.

# Recommendations
Organizations should invest in technology, build partnerships, and stay informed about regulatory changes.

# Conclusion
{topic} offers significant opportunities for organizations that can navigate challenges effectively and capitalize on emerging trends."#
    )
}
